//! Integration tests for the session: dispatch, drag-and-drop, runs, paint.

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Duration;

use botblocks_common::{ApproximateTextMeasure, NoImages, Point, Rect};
use botblocks_dom::{Attribute, Element, ElementKind, NodeId};
use botblocks_engine::{GameConfig, Level, LoadError, Session, StringTable, parse_page};
use botblocks_layout::DisplayCommand;
use botblocks_program::{BlockKind, CodeBlock, Cursor, Move, Step};

/// Palette on the left, program in the middle, two buttons on the right.
const GAME_PAGE: &str = r#"
<horizontal>
  <vertical id="palette" length="200px"></vertical>
  <vertical id="program"></vertical>
  <vertical length="150px">
    <button id="run" onclick="run" text="Run"></button>
    <button id="reset" onclick="reset" text="Reset"><text text="x"/></button>
  </vertical>
</horizontal>
"#;

const LEVEL: &str = r#"{
  "blocks": [{"name": "forward"}, {"name": "left", "color": 1}, {"name": "repeat", "color": 2, "repeat": 2}],
  "map": [[0, 0], [1, 1]]
}"#;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Helper: a session with the approximate measurer and an 800×600 viewport.
fn session() -> Session {
    let mut session = Session::new(
        GameConfig::default(),
        StringTable::new(),
        Box::new(ApproximateTextMeasure),
    );
    session.resize(Rect::new(0.0, 0.0, 800.0, 600.0));
    session
}

/// Helper: the game page with the test level started and laid out.
fn game() -> Session {
    let mut session = session();
    let page = parse_page(GAME_PAGE, &StringTable::new()).expect("page parses");
    let _ = session.set_document(page);
    session.start_level(Level::from_json(LEVEL).expect("level parses"));
    session.relayout();
    session
}

fn leaf(action: Move) -> CodeBlock {
    CodeBlock::leaf(action, 0)
}

fn repeat(n: u32) -> CodeBlock {
    CodeBlock::repeat(NonZeroU32::new(n).expect("non-zero"), 0)
}

/// Helper: a press at `at` held until `until`, then released at `to`.
fn drag(session: &mut Session, at: Point, until: Duration, to: Point) {
    session.pointer_down(at);
    let _ = session.update(until);
    session.pointer_move(to);
    session.pointer_up(to);
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_click_dispatches_callback() {
    let mut session = game();
    let clicked = Rc::new(Cell::new(None));
    let seen = Rc::clone(&clicked);
    session.register("run", move |_, node| seen.set(Some(node)));

    session.pointer_down(Point::new(725.0, 150.0));

    let run = session.document().and_then(|d| d.element_by_id("run"));
    assert!(run.is_some());
    assert_eq!(clicked.get(), run);
}

#[test]
fn test_click_on_button_content_reaches_button() {
    let mut session = game();
    let clicked = Rc::new(Cell::new(None));
    let seen = Rc::clone(&clicked);
    session.register("reset", move |_, node| seen.set(Some(node)));

    session.pointer_down(Point::new(725.0, 450.0));

    let document = session.document().expect("page");
    let hovered = document.hover().expect("something hovered");
    assert_eq!(document.get(hovered).map(|e| e.kind), Some(ElementKind::Text));
    assert_eq!(clicked.get(), document.element_by_id("reset"));
}

#[test]
fn test_unbound_callback_is_ignored() {
    let mut session = game();
    assert!(!session.invoke("nothing-bound", NodeId::ROOT));
    assert!(!session.callbacks().contains("run"));
    // Clicking a button whose callback was never registered is the same miss.
    session.pointer_down(Point::new(725.0, 150.0));
    let document = session.document().expect("page");
    assert!(document.hover().is_some());
}

#[test]
fn test_callback_edits_page_and_next_hit_test_sees_it() {
    let mut session = session();
    let page = parse_page(
        r#"<vertical id="list"><button onclick="more" text="More"></button></vertical>"#,
        &StringTable::new(),
    )
    .expect("page parses");
    let _ = session.set_document(page);

    let added = Rc::new(Cell::new(0));
    let count = Rc::clone(&added);
    session.register("more", |session, _| {
        if let Some(document) = session.document_mut() {
            let list = document.element_by_id("list").unwrap_or(NodeId::ROOT);
            let _ = document.append_child(
                list,
                Element::new(
                    ElementKind::Button,
                    vec![Attribute::new("onclick", "added"), Attribute::new("text", "Added")],
                ),
            );
        }
    });
    session.register("added", move |_, _| count.set(count.get() + 1));

    session.pointer_down(Point::new(400.0, 300.0));
    assert!(session.needs_layout());
    session.pointer_down(Point::new(400.0, 450.0));
    assert_eq!(added.get(), 1);
}

#[test]
fn test_callback_switches_page() {
    let mut session = game();
    session.register("run", |session, _| {
        if let Ok(page) = parse_page(r#"<overlap id="level-select"></overlap>"#, &StringTable::new()) {
            let _ = session.set_document(page);
        }
    });
    session.pointer_down(Point::new(725.0, 150.0));

    let document = session.document().expect("page");
    assert_eq!(document.element_by_id("level-select"), Some(NodeId::ROOT));
    session.relayout();
    let root = session.document().and_then(|d| d.get(NodeId::ROOT)).and_then(|e| e.rect);
    assert_eq!(root, Some(Rect::new(0.0, 0.0, 800.0, 600.0)));
}

#[test]
fn test_callback_may_rebind_itself() {
    let mut session = game();
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&log);
    session.register("run", move |session, _| {
        first.borrow_mut().push("first");
        let second = Rc::clone(&first);
        session.register("run", move |_, _| second.borrow_mut().push("second"));
    });
    assert!(session.invoke("run", NodeId::ROOT));
    assert!(session.invoke("run", NodeId::ROOT));
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn test_callback_may_unregister_itself() {
    let mut session = game();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    session.register("run", move |session, _| {
        *counter.borrow_mut() += 1;
        assert!(session.callbacks_mut().unregister("run"));
    });
    assert!(session.invoke("run", NodeId::ROOT));
    assert!(!session.callbacks().contains("run"));
    assert!(!session.invoke("run", NodeId::ROOT));
    assert_eq!(*calls.borrow(), 1);
}

// =============================================================================
// Palette and drag-and-drop
// =============================================================================

#[test]
fn test_level_palette_is_arranged_in_palette_area() {
    let mut session = game();
    assert_eq!(session.palette().len(), 3);
    assert_eq!(session.level().map(Level::height), Some(2));

    let list = session.paint(&NoImages);
    let labels: Vec<&str> = list
        .commands()
        .iter()
        .filter_map(|c| match c {
            DisplayCommand::DrawText { text, x, .. } if *x < 200.0 => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["forward", "left", "repeat 2"]);
}

#[test]
fn test_tap_on_palette_appends_at_cursor() {
    let mut session = game();
    // Palette blocks stack from (8, 8): 40 tall with 4 px spacing.
    session.pointer_down(Point::new(20.0, 20.0));
    session.pointer_up(Point::new(20.0, 20.0));
    session.pointer_down(Point::new(20.0, 100.0));
    session.pointer_up(Point::new(20.0, 100.0));

    let program = session.program();
    assert_eq!(program.blocks().len(), 2);
    assert_eq!(program.blocks()[0].label(), "forward");
    assert!(program.blocks()[1].is_container());
    assert_eq!(program.cursor().path(), &[2]);
    // Arranged in the program area, inset by the block padding.
    let rect = program.blocks()[0].rect.expect("arranged");
    assert_eq!((rect.x, rect.y), (208.0, 8.0));
}

#[test]
fn test_drag_from_palette_into_empty_repeat() {
    let mut session = game();
    session.place_block(repeat(2)).expect("placed");
    let _ = session.update(ms(0));

    // Hold "left" past the threshold, then drop on the repeat's empty body.
    drag(&mut session, Point::new(20.0, 60.0), ms(300), Point::new(235.0, 50.0));

    assert!(session.dragged().is_none());
    let program = session.program();
    assert_eq!(program.block_count(), 2);
    assert!(matches!(
        program.get(&[0, 0]).map(|b| &b.kind),
        Ok(BlockKind::Leaf { action: Move::Left })
    ));
    assert_eq!(program.cursor().path(), &[0, 1]);
}

#[test]
fn test_drag_shows_gap_while_held() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    session.place_block(leaf(Move::Right)).expect("placed");
    let _ = session.update(ms(0));

    session.pointer_down(Point::new(20.0, 20.0));
    let _ = session.update(ms(250));
    assert!(session.dragged().is_some());
    // Hovering over the second block opens the hole in front of it.
    session.pointer_move(Point::new(210.0, 95.0));
    assert_eq!(session.program().cursor().path(), &[1]);
    let second = session.program().blocks()[1].rect.expect("arranged");
    assert!((second.y - 96.0).abs() < 1e-3);

    session.pointer_up(Point::new(210.0, 95.0));
    let moves: Vec<String> = session.program().blocks().iter().map(CodeBlock::label).collect();
    assert_eq!(moves, vec!["forward", "forward", "right"]);
}

#[test]
fn test_drag_out_of_program_area_discards() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    session.place_block(leaf(Move::Left)).expect("placed");
    let _ = session.update(ms(0));

    drag(&mut session, Point::new(220.0, 20.0), ms(300), Point::new(100.0, 300.0));

    let labels: Vec<String> = session.program().blocks().iter().map(CodeBlock::label).collect();
    assert_eq!(labels, vec!["left"]);
}

#[test]
fn test_short_press_on_program_block_does_nothing() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    let _ = session.update(ms(0));

    session.pointer_down(Point::new(220.0, 20.0));
    let _ = session.update(ms(50));
    session.pointer_up(Point::new(220.0, 20.0));

    assert_eq!(session.program().block_count(), 1);
    assert!(session.dragged().is_none());
}

// =============================================================================
// Running
// =============================================================================

#[test]
fn test_run_releases_moves_on_schedule() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    session.place_block(repeat(2)).expect("placed");
    session
        .program_mut()
        .set_cursor(Cursor::new(vec![1, 0]).expect("non-empty"))
        .expect("valid cursor");
    session.place_block(leaf(Move::Left)).expect("placed");

    assert_eq!(session.update(ms(0)), Step::Idle);
    session.run_program();
    assert!(session.is_running());

    let frames = [100, 500, 999, 1000, 1500, 2000, 2500];
    let steps: Vec<Step> = frames.iter().map(|&t| session.update(ms(t))).collect();
    assert_eq!(
        steps,
        vec![
            Step::Wait,
            Step::Move(Move::Forward),
            Step::Wait,
            Step::Move(Move::Left),
            Step::Move(Move::Left),
            Step::Finished,
            Step::Idle,
        ]
    );
    assert!(!session.is_running());
}

#[test]
fn test_restart_level_clears_program_and_stops_run() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    session.run_program();
    session.restart_level();

    assert!(!session.is_running());
    assert!(session.program().is_empty());
    assert_eq!(session.program().cursor().path(), &[0]);
    assert_eq!(session.palette().len(), 3);
}

// =============================================================================
// Page loading and paint
// =============================================================================

#[test]
fn test_load_page_from_file() {
    let dir = std::env::temp_dir().join(format!("botblocks-session-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let good = dir.join("menu.xml");
    let bad = dir.join("broken.xml");
    std::fs::write(&good, r#"<vertical><button text="menu.play" onclick="play"></button></vertical>"#)
        .expect("write page");
    std::fs::write(&bad, "<vertical>\n  <blink/>\n</vertical>").expect("write page");

    let strings = StringTable::from_json(r#"{"menu": {"play": "Play"}}"#).expect("table");
    let mut session = Session::new(GameConfig::default(), strings, Box::new(ApproximateTextMeasure));
    session.load_page(&good).expect("page loads");
    let button = session
        .document()
        .and_then(|d| d.click_targets("play").first().copied())
        .expect("button indexed");
    assert_eq!(
        session.document().and_then(|d| d.get(button)).map(|e| e.text.as_str()),
        Some("Play")
    );

    let err = session.load_page(&bad).expect_err("unknown tag");
    assert!(matches!(err, LoadError::Parse(ref e) if e.line() == 2));
    // The previous page stays active.
    assert_eq!(session.document().map(|d| d.click_targets("play").len()), Some(1));

    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn test_resize_moves_program_area() {
    let mut session = game();
    session.place_block(leaf(Move::Forward)).expect("placed");
    session.resize(Rect::new(0.0, 0.0, 1000.0, 600.0));
    assert!(session.needs_layout());
    session.relayout();

    let area = session.area("program").expect("program area");
    assert!((area.width - 650.0).abs() < 1e-3);
    let rect = session.program().blocks()[0].rect.expect("arranged");
    assert_eq!((rect.x, rect.y), (208.0, 8.0));
}

#[test]
fn test_paint_draws_dragged_block_at_pointer() {
    let mut session = game();
    let _ = session.update(ms(0));
    session.pointer_down(Point::new(20.0, 20.0));
    let _ = session.update(ms(300));
    session.pointer_move(Point::new(500.0, 400.0));

    let list = session.paint(&NoImages);
    let last_fill = list
        .commands()
        .iter()
        .rev()
        .find_map(|c| match c {
            DisplayCommand::FillRect { rect, .. } => Some(*rect),
            _ => None,
        })
        .expect("dragged block painted");
    assert_eq!((last_fill.x, last_fill.y), (500.0, 400.0));
}

#[test]
fn test_camera_pitch_respects_config() {
    let mut session = game();
    session.update_camera(None, Some(10.0), None);
    let max = session.config().pitch_max;
    assert!((session.camera().pitch - max).abs() < f32::EPSILON);
}
