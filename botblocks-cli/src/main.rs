//! botblocks CLI
//!
//! Headless tools for page authors and level designers: dump a page's
//! element tree, lay it out, render a screenshot, or step a saved program.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use botblocks_common::{Color, Rect};
use botblocks_engine::font_metrics::load_system_font;
use botblocks_engine::{
    GameConfig, ImageProbe, Level, Renderer, Session, StringTable, parse_page, system_measure,
};
use botblocks_layout::{LayoutEngine, Painter};
use botblocks_program::{CodeBlock, Program, Runner, Step};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

/// botblocks: markup UI and block-program tools
#[derive(Parser, Debug)]
#[command(name = "botblocks")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the element tree of a page
    botblocks tree res/menu.xml

    # Lay a page out at 1280x720 and print every rectangle
    botblocks layout res/game.xml --width 1280 --height 720

    # Render a page with a level's palette to PNG
    botblocks render res/game.xml -o game.png --level levels/1.json

    # Step a saved program at 250 ms per move
    botblocks run program.json --delay-ms 250
"#)]
struct Cli {
    /// JSON game configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON string table for page text
    #[arg(long, global = true, value_name = "FILE")]
    strings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a page and print its element tree
    Tree {
        /// Markup file
        page: PathBuf,
    },
    /// Lay a page out and print the placed tree
    Layout {
        /// Markup file
        page: PathBuf,
        /// Viewport width
        #[arg(long, default_value = "800")]
        width: u32,
        /// Viewport height
        #[arg(long, default_value = "600")]
        height: u32,
        /// Print the display list as JSON instead of the tree
        #[arg(long)]
        json: bool,
    },
    /// Render a page to an image file
    Render {
        /// Markup file
        page: PathBuf,
        /// Output image (format from extension)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Viewport width
        #[arg(long, default_value = "800")]
        width: u32,
        /// Viewport height
        #[arg(long, default_value = "600")]
        height: u32,
        /// Directory image sources are resolved against
        #[arg(long, value_name = "DIR", default_value = ".")]
        assets: PathBuf,
        /// Level whose palette is drawn in the palette area
        #[arg(long, value_name = "FILE")]
        level: Option<PathBuf>,
        /// Outline containers by kind
        #[arg(long)]
        debug_outlines: bool,
    },
    /// Step a saved program and print its moves
    Run {
        /// JSON list of blocks
        program: PathBuf,
        /// Pause between moves (defaults to the configured step delay)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Wait in real time instead of printing the schedule at once
        #[arg(long)]
        realtime: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let strings = match &cli.strings {
        Some(path) => StringTable::load(path)?,
        None => StringTable::new(),
    };

    match cli.command {
        Command::Tree { page } => print_tree(&page, &strings),
        Command::Layout {
            page,
            width,
            height,
            json,
        } => print_layout(&page, &config, &strings, viewport(width, height), json),
        Command::Render {
            page,
            output,
            width,
            height,
            assets,
            level,
            debug_outlines,
        } => {
            let config = GameConfig {
                debug_outlines: config.debug_outlines || debug_outlines,
                ..config
            };
            let options = RenderOptions {
                width,
                height,
                assets: &assets,
                level: level.as_deref(),
            };
            render(&page, &output, config, strings, &options)?;
            println!("Screenshot saved to: {}", output.display());
            Ok(())
        }
        Command::Run {
            program,
            delay_ms,
            realtime,
        } => {
            let delay = delay_ms.map_or_else(|| config.step_delay(), Duration::from_millis);
            run(&program, delay, realtime)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn viewport(width: u32, height: u32) -> Rect {
    Rect::new(0.0, 0.0, width as f32, height as f32)
}

fn header(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}

fn read_page(path: &Path, strings: &StringTable) -> Result<botblocks_dom::Document> {
    let markup =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    parse_page(&markup, strings)
        .with_context(|| format!("failed to parse '{}'", path.display()))
}

fn print_tree(path: &Path, strings: &StringTable) -> Result<()> {
    let document = read_page(path, strings)?;
    header("Element Tree");
    print!("{document}");

    let mut callbacks: Vec<&str> = document.callback_names().collect();
    if !callbacks.is_empty() {
        callbacks.sort_unstable();
        println!();
        header("Click Callbacks");
        for name in callbacks {
            println!("  {name} ({} elements)", document.click_targets(name).len());
        }
    }
    Ok(())
}

fn print_layout(
    path: &Path,
    config: &GameConfig,
    strings: &StringTable,
    viewport: Rect,
    json: bool,
) -> Result<()> {
    let mut document = read_page(path, strings)?;
    let measure = system_measure();
    LayoutEngine::new(measure.as_ref(), config.font()).layout(&mut document, viewport);

    if json {
        let probe = ImageProbe::new(path.parent().unwrap_or_else(|| Path::new(".")));
        let list = Painter::new(&probe, config.font())
            .with_debug_outlines(config.debug_outlines)
            .paint(&document);
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        header(&format!(
            "Layout (viewport: {}x{})",
            viewport.width, viewport.height
        ));
        print!("{document}");
        println!("\n{} drawables", document.drawables().len());
    }
    Ok(())
}

struct RenderOptions<'a> {
    width: u32,
    height: u32,
    assets: &'a Path,
    level: Option<&'a Path>,
}

fn render(
    page: &Path,
    output: &Path,
    config: GameConfig,
    strings: StringTable,
    options: &RenderOptions<'_>,
) -> Result<()> {
    let mut session = Session::new(config, strings, system_measure());
    session.resize(viewport(options.width, options.height));
    session.load_page(page)?;
    if let Some(level) = options.level {
        session.start_level(Level::load(level)?);
    }

    let probe = ImageProbe::new(options.assets);
    let list = session.paint(&probe);
    let images = probe.decode_all(&list);
    let mut renderer = Renderer::new(
        options.width,
        options.height,
        Color::BLACK,
        load_system_font(),
        images,
    );
    renderer.render(&list);
    renderer.save(output)
}

fn run(path: &Path, delay: Duration, realtime: bool) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let blocks: Vec<CodeBlock> = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not a block list", path.display()))?;
    let program = Program::from_blocks(blocks);

    header(&format!(
        "Program ({} blocks, {} ms per move)",
        program.block_count(),
        delay.as_millis()
    ));

    let mut runner = Runner::new(delay);
    let started = Instant::now();
    let mut now = Duration::ZERO;
    runner.run(&program, now);
    let mut count = 0_u32;
    loop {
        match runner.poll(now) {
            Step::Move(action) => {
                count += 1;
                println!("{:>8} ms  {}", now.as_millis(), action.green());
            }
            Step::Wait => {
                // Jump (or sleep) to the next due time.
                let due = delay.saturating_mul(runner.released() + 1);
                if realtime {
                    thread::sleep(due.saturating_sub(started.elapsed()));
                    now = started.elapsed();
                } else {
                    now = due;
                }
            }
            Step::Finished | Step::Idle => break,
        }
    }
    println!("{count} moves");
    Ok(())
}
