//! End-to-end editor behaviour through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use richtext_core::{
    ActiveBlock, ChangeNotification, EditEvent, EditorConfig, FormatCommand, FormatState,
    Position, RichTextEditor, Selection, Toolbar, decode, encode,
};

type Editor = RichTextEditor<Vec<ChangeNotification>>;

fn editor(value: &str) -> Editor {
    RichTextEditor::new(Some(value), Vec::new(), EditorConfig::default())
}

fn select(ed: &mut Editor, b1: usize, o1: usize, b2: usize, o2: usize) {
    ed.set_selection(Selection::new(Position::new(b1, o1), Position::new(b2, o2)));
}

fn emitted(ed: &Editor) -> Vec<&str> {
    ed.sink().iter().map(|c| c.markup.as_str()).collect()
}

#[test]
fn bold_then_type_on_empty_document() {
    let mut ed = RichTextEditor::new(None, Vec::new(), EditorConfig::default());
    ed.focus();
    ed.dispatch(FormatCommand::Bold, None);
    ed.handle_input(EditEvent::InsertText("h".into()));
    ed.handle_input(EditEvent::InsertText("i".into()));

    assert_eq!(ed.value(), "<p><strong>hi</strong></p>");
    assert_eq!(
        *ed.format_state(),
        FormatState {
            bold: true,
            ..FormatState::default()
        }
    );
    assert_eq!(
        emitted(&ed),
        vec!["<p><strong>h</strong></p>", "<p><strong>hi</strong></p>"]
    );
}

#[test]
fn bold_survives_enter_before_typing() {
    let mut ed = editor("<p>ab</p>");
    ed.dispatch(FormatCommand::Bold, None);
    ed.handle_input(EditEvent::InsertParagraph);
    assert!(ed.format_state().bold);

    ed.handle_input(EditEvent::InsertText("x".into()));
    assert_eq!(ed.value(), "<p>ab</p><p><strong>x</strong></p>");
    assert!(ed.format_state().bold);
}

#[test]
fn named_entities_survive_first_edit() {
    let mut ed = editor("<p>&copy; 2024 &mdash; &hellip;</p>");
    assert_eq!(
        ed.document().blocks()[0].text(),
        "\u{a9} 2024 \u{2014} \u{2026}"
    );

    ed.handle_input(EditEvent::InsertText("!".into()));
    assert_eq!(emitted(&ed), vec!["<p>\u{a9} 2024 \u{2014} \u{2026}!</p>"]);
}

#[test]
fn heading_and_body_roundtrip_identically() {
    let ed = editor("<h2>Title</h2><p>Body</p>");
    assert_eq!(ed.value(), "<h2>Title</h2><p>Body</p>");
    assert_eq!(encode(&decode(ed.value())), ed.value());
}

#[test]
fn unordered_list_toggle_on_list_block() {
    let mut ed = editor("<ul><li>milk</li></ul>");
    ed.set_selection(Selection::caret(0, 2));
    assert!(ed.format_state().unordered_list);

    assert!(ed.dispatch(FormatCommand::UnorderedList, None));
    assert_eq!(ed.value(), "<p>milk</p>");
    assert!(!ed.format_state().unordered_list);
}

#[test]
fn heading_twice_is_paragraph() {
    let mut ed = editor("<p>Plan</p>");
    ed.dispatch(FormatCommand::Heading2, None);
    ed.dispatch(FormatCommand::Heading2, None);
    assert_eq!(ed.value(), "<p>Plan</p>");
    assert_eq!(
        emitted(&ed),
        vec!["<h2>Plan</h2>", "<p>Plan</p>"]
    );
}

#[test]
fn list_kinds_stay_exclusive() {
    let mut ed = editor("<p>a</p><p>b</p>");
    select(&mut ed, 0, 0, 1, 1);
    ed.dispatch(FormatCommand::OrderedList, None);
    ed.dispatch(FormatCommand::UnorderedList, None);
    assert_eq!(ed.value(), "<ul><li>a</li><li>b</li></ul>");
    let state = ed.format_state();
    assert!(state.unordered_list && !state.ordered_list);
}

#[test]
fn echoed_value_causes_no_mutation_or_notification() {
    let mut ed = editor("<p>draft</p>");
    select(&mut ed, 0, 0, 0, 5);
    ed.dispatch(FormatCommand::Italic, None);
    let last = ed.sink()[0].markup.clone();
    let selection = ed.selection();

    assert!(!ed.external_value_changed(&last));
    assert_eq!(ed.sink().len(), 1);
    assert_eq!(ed.selection(), selection);
    assert_eq!(ed.value(), last);
}

#[test]
fn external_replacement_is_not_echoed() {
    let mut ed = editor("<p>draft</p>");
    assert!(ed.external_value_changed("<blockquote>quoted</blockquote>"));
    assert_eq!(ed.format_state().block_kind, ActiveBlock::Blockquote);
    assert!(ed.sink().is_empty());

    ed.set_selection(Selection::caret(0, 6));
    ed.handle_input(EditEvent::InsertText("!".into()));
    assert_eq!(emitted(&ed), vec!["<blockquote>quoted!</blockquote>"]);
}

#[test]
fn link_prompt_flow() {
    let mut ed = editor("<p>read the docs</p>");
    select(&mut ed, 0, 9, 0, 13);

    let mut cancel = |_: &str| -> Option<String> { None };
    assert!(!Toolbar::activate(FormatCommand::Link, &mut ed, &mut cancel));
    let mut blank = |_: &str| Some("   ".to_string());
    assert!(!Toolbar::activate(FormatCommand::Link, &mut ed, &mut blank));
    assert!(ed.sink().is_empty());

    let mut asked = None;
    let mut answer = |message: &str| {
        asked = Some(message.to_string());
        Some("https://docs.rs".to_string())
    };
    assert!(Toolbar::activate(FormatCommand::Link, &mut ed, &mut answer));
    assert_eq!(asked.as_deref(), Some("Enter URL:"));
    assert_eq!(
        ed.value(),
        r#"<p>read the <a href="https://docs.rs">docs</a></p>"#
    );
}

#[test]
fn collapsed_link_is_noop() {
    let mut ed = editor("<p>text</p>");
    ed.set_selection(Selection::caret(0, 2));
    assert!(!ed.dispatch(FormatCommand::Link, Some("https://example.com")));
    assert_eq!(ed.value(), "<p>text</p>");
    assert!(ed.sink().is_empty());
}

#[test]
fn toolbar_reflects_state() {
    let mut ed = editor("<h1><u>Head</u></h1><pre>code</pre>");
    ed.set_selection(Selection::caret(0, 2));
    let toolbar = ed.toolbar();
    let active: Vec<_> = toolbar
        .items()
        .filter(|i| i.active)
        .map(|i| i.command)
        .collect();
    assert_eq!(active, vec![FormatCommand::Heading1, FormatCommand::Underlined]);

    ed.set_selection(Selection::caret(1, 1));
    assert!(ed.toolbar().item(FormatCommand::CodeBlock).is_some_and(|i| i.active));
    assert!(!ed.toolbar().item(FormatCommand::Underlined).is_some_and(|i| i.active));
}

#[test]
fn typing_session_builds_document() {
    let mut ed = RichTextEditor::new(None, Vec::new(), EditorConfig::default());
    ed.dispatch(FormatCommand::Heading1, None);
    ed.handle_input(EditEvent::InsertText("Groceries".into()));
    ed.handle_input(EditEvent::InsertParagraph);
    ed.dispatch(FormatCommand::UnorderedList, None);
    ed.handle_input(EditEvent::InsertText("milk".into()));
    ed.handle_input(EditEvent::InsertParagraph);
    ed.handle_input(EditEvent::InsertText("eggs".into()));
    ed.handle_input(EditEvent::InsertParagraph);
    ed.handle_input(EditEvent::InsertParagraph);
    ed.handle_input(EditEvent::InsertText("done".into()));

    insta::assert_snapshot!(
        ed.value(),
        @"<h1>Groceries</h1><ul><li>milk</li><li>eggs</li></ul><p>done</p>"
    );
    assert_eq!(ed.revision(), ed.sink().len() as u64);
}

#[test]
fn closure_sink_receives_revisions() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let log = Rc::clone(&log);
        move |change: &ChangeNotification| log.borrow_mut().push(change.revision)
    };
    let mut ed = RichTextEditor::new(Some("<p>x</p>"), sink, EditorConfig::default());
    ed.handle_input(EditEvent::DeleteContentBackward);
    ed.handle_input(EditEvent::DeleteContentBackward);
    ed.handle_input(EditEvent::InsertText("y".into()));
    assert_eq!(*log.borrow(), vec![1, 2]);
}

#[test]
fn pasted_lines_keep_block_kind() {
    let mut ed = editor("<blockquote>a</blockquote>");
    ed.handle_input(EditEvent::InsertFromPaste("b\nc".into()));
    assert_eq!(
        ed.value(),
        "<blockquote>ab</blockquote><blockquote>c</blockquote>"
    );
    assert_eq!(ed.selection(), Selection::caret(1, 1));
}

#[test]
fn config_deserialises_with_defaults() {
    let config: EditorConfig = serde_json::from_str(r#"{"placeholder": "Say something"}"#)
        .expect("valid config");
    assert_eq!(config.placeholder, "Say something");
    assert_eq!(config.link_prompt, "Enter URL:");
}
