//! The session: one running game's state and its per-frame entry points.
//!
//! A host drives a session with three kinds of calls:
//!
//! - pointer events ([`Session::pointer_move`], [`Session::pointer_down`],
//!   [`Session::pointer_up`]), which hit-test the page, dispatch clicks and
//!   drag blocks;
//! - [`Session::update`] once per frame, which advances the clock and
//!   releases at most one program move;
//! - [`Session::paint`] whenever it wants a frame to draw.
//!
//! Page mutations mark the session for re-layout; the next event or paint
//! lays the page out again before it looks at any rectangle.

use std::path::Path;
use std::time::Duration;

use botblocks_common::warning::warn_once;
use botblocks_common::{Color, ImageProvider, Point, Rect, TextMeasure};
use botblocks_dom::{Document, NodeId};
use botblocks_layout::{DisplayCommand, DisplayList, LayoutEngine, Painter, update_hover};
use botblocks_program::{
    AddressError, BlockStyle, BlockTemplate, CodeBlock, Program, Runner, Step, Ticks,
};

use crate::callbacks::CallbackRegistry;
use crate::camera::Camera;
use crate::config::GameConfig;
use crate::loader::{self, Level, LoadError};
use crate::strings::StringTable;

/// Block fill colours, indexed by skin.
const SKINS: [Color; 6] = [
    Color::from_u32(0x3A7B_D5FF),
    Color::from_u32(0xE08A_2EFF),
    Color::from_u32(0x4CAF_50FF),
    Color::from_u32(0x9C27_B0FF),
    Color::from_u32(0xD32F_2FFF),
    Color::from_u32(0x0096_88FF),
];

fn skin_color(skin: u32) -> Color {
    SKINS[skin as usize % SKINS.len()]
}

/// What a press landed on.
#[derive(Debug, Clone)]
enum Grab {
    /// A block already in the program.
    Program(Vec<usize>),
    /// A palette entry.
    Palette(usize),
}

#[derive(Debug, Clone)]
struct Press {
    at: Duration,
    grab: Grab,
}

/// Application context for one player.
pub struct Session {
    config: GameConfig,
    strings: StringTable,
    measure: Box<dyn TextMeasure>,
    callbacks: CallbackRegistry,
    document: Option<Document>,
    viewport: Rect,
    needs_layout: bool,
    program: Program,
    palette: Vec<BlockTemplate>,
    /// One instance of each palette entry, arranged like a program.
    palette_view: Program,
    level: Option<Level>,
    runner: Runner,
    ticks: Ticks,
    camera: Camera,
    pointer: Point,
    press: Option<Press>,
    drag: Option<CodeBlock>,
}

impl Session {
    /// Start a session with no page and no level.
    #[must_use]
    pub fn new(config: GameConfig, strings: StringTable, measure: Box<dyn TextMeasure>) -> Self {
        let style = config.blocks.clone();
        Self {
            runner: Runner::new(config.step_delay()),
            program: Program::new().with_style(style.clone()),
            palette_view: Program::new().with_style(style),
            config,
            strings,
            measure,
            callbacks: CallbackRegistry::new(),
            document: None,
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            needs_layout: false,
            palette: Vec::new(),
            level: None,
            ticks: Ticks::new(),
            camera: Camera::default(),
            pointer: Point::default(),
            press: None,
            drag: None,
        }
    }

    // ========================================================================
    // Context
    // ========================================================================

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Display strings.
    #[must_use]
    pub const fn strings(&self) -> &StringTable {
        &self.strings
    }

    /// The text measurer layout uses.
    #[must_use]
    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    /// Frame clock.
    #[must_use]
    pub const fn ticks(&self) -> &Ticks {
        &self.ticks
    }

    /// Level view parameters.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Move the level view; pitch stays inside the configured range.
    pub fn update_camera(&mut self, yaw: Option<f32>, pitch: Option<f32>, zoom: Option<f32>) {
        self.camera.update_position(&self.config, yaw, pitch, zoom);
    }

    /// Click callbacks.
    #[must_use]
    pub const fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Click callbacks, for registration.
    pub const fn callbacks_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.callbacks
    }

    /// Shorthand for registering on [`Session::callbacks_mut`].
    pub fn register(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&mut Self, NodeId) + 'static,
    ) {
        self.callbacks.register(name, callback);
    }

    // ========================================================================
    // Page
    // ========================================================================

    /// The active page.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The active page, for editing. Marks the session for re-layout.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.needs_layout = true;
        self.document.as_mut()
    }

    /// Make `document` the active page, returning the previous one.
    pub fn set_document(&mut self, document: Document) -> Option<Document> {
        self.needs_layout = true;
        self.document.replace(document)
    }

    /// Load a markup file and make it the active page.
    ///
    /// # Errors
    ///
    /// See [`loader::load_page`]. The active page is unchanged on error.
    pub fn load_page(&mut self, path: &Path) -> Result<(), LoadError> {
        let document = loader::load_page(path, &self.strings)?;
        let _ = self.set_document(document);
        Ok(())
    }

    /// The area pages are laid out in.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Change the viewport (a window resize).
    pub const fn resize(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.needs_layout = true;
    }

    /// Whether rectangles are stale.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Lay the page out and re-arrange the blocks now.
    pub fn relayout(&mut self) {
        if let Some(document) = self.document.as_mut() {
            LayoutEngine::new(self.measure.as_ref(), self.config.font())
                .layout(document, self.viewport);
        }
        self.needs_layout = false;
        self.arrange_blocks();
    }

    fn ensure_layout(&mut self) {
        if self.needs_layout {
            self.relayout();
        }
    }

    /// Rectangle of the element with identifier `ident` on the active page.
    #[must_use]
    pub fn area(&self, ident: &str) -> Option<Rect> {
        let document = self.document.as_ref()?;
        document.get(document.element_by_id(ident)?)?.rect
    }

    /// Top-left of the list laid out in area `ident`, inset by the block
    /// padding; the viewport corner when the page has no such area.
    fn list_origin(&self, ident: &str) -> Point {
        let padding = self.config.blocks.padding;
        self.area(ident).map_or_else(
            || self.viewport.origin(),
            |rect| Point::new(rect.x + padding, rect.y + padding),
        )
    }

    fn arrange_blocks(&mut self) {
        let program_origin = self.list_origin(&self.config.program_area);
        let palette_origin = self.list_origin(&self.config.palette_area);
        let measure = self.measure.as_ref();
        self.program
            .arrange(program_origin, measure, self.drag.is_some());
        self.palette_view.arrange(palette_origin, measure, false);
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Last pointer position.
    #[must_use]
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    /// The block being dragged, if any.
    #[must_use]
    pub const fn dragged(&self) -> Option<&CodeBlock> {
        self.drag.as_ref()
    }

    /// Pointer moved: refresh hover and follow any drag.
    pub fn pointer_move(&mut self, pos: Point) {
        self.pointer = pos;
        self.ensure_layout();
        self.promote_press();
        if self.drag.is_some() {
            self.track_drop();
        }
        if let Some(document) = self.document.as_mut() {
            let _ = update_hover(document, pos);
        }
    }

    /// Pointer pressed.
    ///
    /// A press on a program or palette block may become a drag; anywhere
    /// else it is a click on the page.
    pub fn pointer_down(&mut self, pos: Point) {
        self.pointer = pos;
        self.ensure_layout();
        if self.drag.is_some() {
            return;
        }
        let grab = self.program.block_at(pos).map(Grab::Program).or_else(|| {
            self.palette_view
                .block_at(pos)
                .and_then(|path| path.first().copied())
                .map(Grab::Palette)
        });
        if let Some(grab) = grab {
            self.press = Some(Press {
                at: self.ticks.now(),
                grab,
            });
        } else {
            self.click(pos);
        }
    }

    /// Pointer released: drop a dragged block, or treat a short press on
    /// the palette as "append at the cursor".
    pub fn pointer_up(&mut self, pos: Point) {
        self.pointer = pos;
        self.ensure_layout();
        self.promote_press();
        if self.drag.is_some() {
            self.track_drop();
            if let Some(block) = self.drag.take() {
                self.drop_block(block);
            }
            return;
        }
        if let Some(Press {
            grab: Grab::Palette(index),
            ..
        }) = self.press.take()
            && let Some(block) = self.instantiate(index)
        {
            self.place_or_warn(block);
        }
    }

    fn click(&mut self, pos: Point) {
        let Some(document) = self.document.as_mut() else {
            return;
        };
        let mut target = update_hover(document, pos);
        // The innermost bound element wins, so a click on a button's
        // content reaches the button.
        while let Some(node) = target {
            if let Some(name) = document.get(node).and_then(|e| e.on_click.clone()) {
                let _ = self.invoke(&name, node);
                return;
            }
            target = document.parent(node);
        }
    }

    /// Run the callback bound to `name` for element `node`.
    ///
    /// An unbound name is a lookup miss: warned once and ignored. Returns
    /// whether a callback ran. The page is re-laid out before it is next
    /// used.
    pub fn invoke(&mut self, name: &str, node: NodeId) -> bool {
        let Some(mut callback) = self.callbacks.take(name) else {
            warn_once("session", &format!("no callback registered for '{name}'"));
            return false;
        };
        callback(self, node);
        self.callbacks.restore(name, callback);
        self.needs_layout = true;
        true
    }

    /// Turn a press held past the drag threshold into a drag.
    fn promote_press(&mut self) {
        let threshold = self.config.drag_threshold();
        if self.drag.is_some()
            || self
                .press
                .as_ref()
                .is_none_or(|press| self.ticks.now().saturating_sub(press.at) < threshold)
        {
            return;
        }
        let Some(press) = self.press.take() else {
            return;
        };
        self.drag = match press.grab {
            Grab::Program(path) => match self.program.remove(&path) {
                Ok(block) => Some(block),
                Err(e) => {
                    warn_once("session", &format!("cannot drag block: {e}"));
                    None
                }
            },
            Grab::Palette(index) => self.instantiate(index),
        };
        if self.drag.is_some() {
            self.track_drop();
        }
    }

    /// Move the cursor to the slot nearest the pointer.
    fn track_drop(&mut self) {
        let slot = self.program.nearest_insertion_point(self.pointer);
        if let Err(e) = self.program.set_cursor(slot) {
            warn_once("session", &format!("bad drop slot: {e}"));
        }
        self.arrange_blocks();
    }

    /// Place a dropped block at the cursor, or discard it when it was
    /// dropped outside the program area.
    fn drop_block(&mut self, block: CodeBlock) {
        let inside = self
            .area(&self.config.program_area)
            .is_none_or(|rect| rect.contains(self.pointer));
        if inside {
            self.place_or_warn(block);
        } else {
            self.arrange_blocks();
        }
    }

    fn place_or_warn(&mut self, block: CodeBlock) {
        if let Err(e) = self.place_block(block) {
            warn_once("session", &format!("cannot place block: {e}"));
        }
    }

    // ========================================================================
    // Program and level
    // ========================================================================

    /// The player's program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// The player's program, for editing. Blocks are re-arranged before
    /// the next event or paint.
    pub const fn program_mut(&mut self) -> &mut Program {
        self.needs_layout = true;
        &mut self.program
    }

    /// Insert `block` at the cursor.
    ///
    /// # Errors
    ///
    /// When the cursor does not address a list.
    pub fn place_block(&mut self, block: CodeBlock) -> Result<(), AddressError> {
        self.program.place(block)?;
        self.arrange_blocks();
        Ok(())
    }

    /// Remove and return the block at `path`.
    ///
    /// # Errors
    ///
    /// When `path` does not address a block.
    pub fn remove_block(&mut self, path: &[usize]) -> Result<CodeBlock, AddressError> {
        let block = self.program.remove(path)?;
        self.arrange_blocks();
        Ok(block)
    }

    /// Palette entries of the current level.
    #[must_use]
    pub fn palette(&self) -> &[BlockTemplate] {
        &self.palette
    }

    /// The current level.
    #[must_use]
    pub const fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    fn instantiate(&self, index: usize) -> Option<CodeBlock> {
        self.palette.get(index).and_then(|t| t.instantiate().ok())
    }

    /// Begin `level`: its palette replaces the old one and the program
    /// starts empty.
    ///
    /// Entries that name no move are skipped with a warning.
    pub fn start_level(&mut self, level: Level) {
        self.palette = level
            .blocks
            .iter()
            .filter(|template| match template.instantiate() {
                Ok(_) => true,
                Err(e) => {
                    warn_once("session", &format!("{e}, palette entry skipped"));
                    false
                }
            })
            .cloned()
            .collect();
        let blocks = self
            .palette
            .iter()
            .filter_map(|template| template.instantiate().ok())
            .collect();
        self.palette_view = Program::from_blocks(blocks).with_style(self.config.blocks.clone());
        self.level = Some(level);
        self.restart_level();
    }

    /// Start the current level over: stop any run, empty the program and
    /// reset the cursor.
    pub fn restart_level(&mut self) {
        self.runner.stop();
        self.program.reset();
        self.press = None;
        self.drag = None;
        self.arrange_blocks();
    }

    /// Run the program from the top. A run in progress is discarded.
    pub fn run_program(&mut self) {
        self.runner.run(&self.program, self.ticks.now());
    }

    /// Cancel the current run.
    pub fn stop_program(&mut self) {
        self.runner.stop();
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.runner.is_running()
    }

    /// Start a frame at `now`: advance the clock, promote a long press to a
    /// drag, and release the next move if it is due.
    pub fn update(&mut self, now: Duration) -> Step {
        self.ticks.update(now);
        self.promote_press();
        self.runner.poll(self.ticks.now())
    }

    // ========================================================================
    // Paint
    // ========================================================================

    /// Draw the page, then the palette, the program and the dragged block.
    pub fn paint(&mut self, images: &dyn ImageProvider) -> DisplayList {
        self.ensure_layout();
        let mut list = self.document.as_ref().map_or_else(DisplayList::new, |document| {
            Painter::new(images, self.config.font())
                .with_debug_outlines(self.config.debug_outlines)
                .paint(document)
        });
        let style = self.program.style();
        paint_blocks(&mut list, self.palette_view.blocks(), style);
        paint_blocks(&mut list, self.program.blocks(), style);
        if let Some(block) = &self.drag {
            let mut floating = Program::from_blocks(vec![block.clone()]).with_style(style.clone());
            floating.arrange(self.pointer, self.measure.as_ref(), false);
            paint_blocks(&mut list, floating.blocks(), style);
        }
        list
    }
}

fn paint_blocks(list: &mut DisplayList, blocks: &[CodeBlock], style: &BlockStyle) {
    for block in blocks {
        let Some(rect) = block.rect else {
            continue;
        };
        list.push(DisplayCommand::FillRect {
            rect,
            color: skin_color(block.skin),
        });
        list.push(DisplayCommand::StrokeRect {
            rect,
            color: Color::BLACK,
            width: 1.0,
        });
        list.push(DisplayCommand::DrawText {
            x: rect.x + style.padding,
            y: rect.y + style.padding,
            text: block.label(),
            font_size: style.font.size,
            color: Color::WHITE,
        });
        if let Some(body) = block.children() {
            paint_blocks(list, body, style);
        }
    }
}
