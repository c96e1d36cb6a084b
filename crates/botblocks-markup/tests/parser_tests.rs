//! Integration tests for the markup parser.

use botblocks_dom::{Document, ElementKind, Length, NodeId};
use botblocks_markup::{ParseErrorKind, Position, parse};

/// Helper to parse markup that must succeed.
fn parse_ok(markup: &str) -> Document {
    parse(markup).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

/// Helper to parse markup that must fail, returning the error kind.
fn parse_err(markup: &str) -> ParseErrorKind {
    match parse(markup) {
        Ok(doc) => panic!("expected an error, got:\n{doc}"),
        Err(e) => e.kind,
    }
}

/// Helper to list the kinds of a node's children.
fn child_kinds(doc: &Document, id: NodeId) -> Vec<ElementKind> {
    doc.children(id)
        .iter()
        .filter_map(|&c| doc.get(c).map(|e| e.kind))
        .collect()
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_nested_containers() {
    let doc = parse_ok(
        r#"
        <vertical id="main">
            <horizontal length="50px">
                <button onclick="go"><text text="Go"/></button>
                <space/>
            </horizontal>
            <image source="robot.png"/>
        </vertical>
        "#,
    );
    let root = doc.get(NodeId::ROOT).expect("root");
    assert_eq!(root.kind, ElementKind::Vertical);
    assert_eq!(child_kinds(&doc, NodeId::ROOT), vec![ElementKind::Horizontal, ElementKind::Image]);

    let row = doc.children(NodeId::ROOT)[0];
    assert_eq!(doc.get(row).map(|e| e.length), Some(Length::Pixels(50.0)));
    assert_eq!(child_kinds(&doc, row), vec![ElementKind::Button, ElementKind::Space]);

    let button = doc.children(row)[0];
    assert_eq!(child_kinds(&doc, button), vec![ElementKind::Text]);
    assert_eq!(doc.click_targets("go"), &[button]);
    assert_eq!(doc.element_by_id("main"), Some(NodeId::ROOT));
}

#[test]
fn test_void_elements_need_no_slash() {
    let doc = parse_ok("<horizontal><space><text text=hi><image></horizontal>");
    assert_eq!(
        child_kinds(&doc, NodeId::ROOT),
        vec![ElementKind::Space, ElementKind::Text, ElementKind::Image]
    );
}

#[test]
fn test_self_closing_container_is_empty() {
    let doc = parse_ok("<vertical><horizontal/><overlap/></vertical>");
    let kids = doc.children(NodeId::ROOT);
    assert_eq!(kids.len(), 2);
    assert!(doc.children(kids[0]).is_empty());
    assert!(doc.children(kids[1]).is_empty());
}

#[test]
fn test_single_void_root() {
    let doc = parse_ok("  <space color=\"#ff0000\"/>  ");
    assert_eq!(doc.get(NodeId::ROOT).map(|e| e.kind), Some(ElementKind::Space));
}

#[test]
fn test_deep_nesting_does_not_recurse() {
    let depth = 5_000;
    let markup = format!("{}{}", "<overlap>".repeat(depth), "</overlap>".repeat(depth));
    let doc = parse_ok(&markup);
    assert_eq!(doc.len(), depth);
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn test_text_attribute_then_character_data() {
    let doc = parse_ok("<button text=\"Play\">  now  <space/></button>");
    assert_eq!(doc.get(NodeId::ROOT).map(|e| e.text.as_str()), Some("Play now"));
}

#[test]
fn test_text_runs_around_comments_are_concatenated() {
    let doc = parse_ok("<button>Hello <!-- greeting --> world</button>");
    assert_eq!(doc.get(NodeId::ROOT).map(|e| e.text.as_str()), Some("Helloworld"));
}

#[test]
fn test_entities_in_text_and_attributes() {
    let doc = parse_ok("<button text=\"a&amp;b\">&lt;&#x21;&gt;</button>");
    assert_eq!(doc.get(NodeId::ROOT).map(|e| e.text.as_str()), Some("a&b<!>"));
}

#[test]
fn test_tag_names_are_case_insensitive() {
    let doc = parse_ok("<Vertical LENGTH=\"min\"></VERTICAL>");
    let root = doc.get(NodeId::ROOT).expect("root");
    assert_eq!(root.kind, ElementKind::Vertical);
    assert_eq!(root.length, Length::Min);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unknown_tag() {
    assert_eq!(parse_err("<vertical><div></div></vertical>"), ParseErrorKind::UnknownTag("div".into()));
}

#[test]
fn test_void_end_tag() {
    assert_eq!(
        parse_err("<vertical><text></text></vertical>"),
        ParseErrorKind::VoidEndTag("text".into())
    );
}

#[test]
fn test_mismatched_end_tag() {
    assert_eq!(
        parse_err("<vertical><horizontal></vertical>"),
        ParseErrorKind::MismatchedEndTag {
            open: "horizontal".into(),
            close: "vertical".into(),
        }
    );
}

#[test]
fn test_end_tag_with_nothing_open() {
    assert_eq!(parse_err("</vertical>"), ParseErrorKind::UnexpectedEndTag("vertical".into()));
}

#[test]
fn test_text_outside_element() {
    assert_eq!(parse_err("hello <space/>"), ParseErrorKind::TextOutsideElement("hello".into()));
    assert_eq!(parse_err("<space/> bye"), ParseErrorKind::TextOutsideElement("bye".into()));
}

#[test]
fn test_trailing_root() {
    assert_eq!(
        parse_err("<vertical></vertical><horizontal></horizontal>"),
        ParseErrorKind::TrailingContent("horizontal".into())
    );
}

#[test]
fn test_unexpected_eof() {
    assert_eq!(parse_err("   <!-- nothing -->  "), ParseErrorKind::NoRootElement);
    assert_eq!(
        parse_err("<vertical><horizontal></horizontal>"),
        ParseErrorKind::UnclosedElement("vertical".into())
    );
    assert_eq!(parse_err("<vertical"), ParseErrorKind::EofInTag);
}

#[test]
fn test_error_reports_position_and_line() {
    let err = parse("<vertical>\n  <space/>\n  <blink/>\n</vertical>").unwrap_err();
    assert_eq!(err.position, Position { line: 3, column: 3 });
    assert_eq!(err.line(), 3);
    assert_eq!(err.source_line, "  <blink/>");
    let message = err.to_string();
    assert!(message.contains("unrecognised element <blink>"));
    assert!(message.contains("line 3, column 3"));
}
