//! Command and edit execution for structured documents.
//!
//! [`execute_command`] applies a [`FormatCommand`] to a document over a
//! selection, [`execute_edit`] applies an [`EditEvent`]. Both are pure tree
//! transformations: pending caret styles and change notification live one
//! layer up, in [`crate::surface::DocumentSurface`].

use crate::actions::{EditEvent, FormatCommand};
use crate::document::{BlockKind, InlineFlag, InlineStyle, StructuredDocument, TextRun};
use crate::text_helpers::{find_word_boundary_backward, find_word_boundary_forward};
use crate::types::{Position, Selection};

/// Execute a formatting command over a selection.
///
/// Returns true if the document was modified. Collapsed inline toggles do
/// not touch the tree and return false.
pub fn execute_command(
    doc: &mut StructuredDocument,
    command: FormatCommand,
    selection: Selection,
    argument: Option<&str>,
) -> bool {
    let clamped = doc.clamp_selection(selection);
    if clamped != selection {
        tracing::trace!(?selection, ?clamped, "clamped stale selection");
    }
    let before = doc.clone();
    match (command.inline_flag(), command.block_kind()) {
        (Some(flag), _) => execute_toggle_inline(doc, flag, clamped),
        (None, Some(kind @ (BlockKind::Blockquote | BlockKind::CodeBlock))) => {
            execute_set_block(doc, kind, clamped)
        }
        (None, Some(kind)) => execute_toggle_block(doc, kind, clamped),
        (None, None) => execute_link(doc, clamped, argument),
    }
    *doc != before
}

/// Whether `flag` is set on every character covered by the selection.
///
/// Returns `None` when the selection covers no styleable characters.
pub fn uniform_flag(doc: &StructuredDocument, flag: InlineFlag, sel: Selection) -> Option<bool> {
    let mut covered = false;
    for (index, range) in doc.covered_segments(sel) {
        let Some(block) = doc.block(index) else {
            continue;
        };
        if !block.kind.allows_inline_style() {
            continue;
        }
        for run in block.covered_runs(range.start, range.end) {
            covered = true;
            if !run.style.get(flag) {
                return Some(false);
            }
        }
    }
    covered.then_some(true)
}

fn execute_toggle_inline(doc: &mut StructuredDocument, flag: InlineFlag, sel: Selection) {
    if sel.is_collapsed() {
        return;
    }
    let Some(all_set) = uniform_flag(doc, flag, sel) else {
        tracing::debug!(?flag, "selection covers no styleable text");
        return;
    };
    let value = !all_set;
    for (index, range) in doc.covered_segments(sel) {
        let block = doc.block_mut(index);
        if !block.kind.allows_inline_style() {
            continue;
        }
        block.update_range(range.start, range.end, |run| run.style.set(flag, value));
    }
}

/// Convert touched blocks to `kind`, or back to paragraphs if they all
/// already are `kind`.
fn execute_toggle_block(doc: &mut StructuredDocument, kind: BlockKind, sel: Selection) {
    let touched = sel.blocks();
    let all_match = doc.blocks()[touched.clone()]
        .iter()
        .all(|block| block.kind == kind);
    let target = if all_match { BlockKind::Paragraph } else { kind };
    for block in &mut doc.blocks_mut()[touched] {
        block.kind = target;
        block.normalize();
    }
}

/// Convert touched blocks to `kind`. Blocks already of that kind are left
/// alone.
fn execute_set_block(doc: &mut StructuredDocument, kind: BlockKind, sel: Selection) {
    for block in &mut doc.blocks_mut()[sel.blocks()] {
        if block.kind != kind {
            block.kind = kind;
            block.normalize();
        }
    }
}

fn execute_link(doc: &mut StructuredDocument, sel: Selection, argument: Option<&str>) {
    let Some(url) = argument.map(str::trim).filter(|url| !url.is_empty()) else {
        tracing::debug!("link without url, ignoring");
        return;
    };
    if sel.is_collapsed() {
        tracing::debug!(url, "link on collapsed selection, ignoring");
        return;
    }
    for (index, range) in doc.covered_segments(sel) {
        let block = doc.block_mut(index);
        if !block.kind.allows_inline_style() {
            continue;
        }
        block.update_range(range.start, range.end, |run| run.link = Some(url.into()));
    }
}

/// Execute a direct user edit over a selection.
///
/// `style` is the inline style for inserted text when the caller has one
/// pending; otherwise the text inherits from its surroundings. Returns the
/// collapsed selection after the edit.
pub fn execute_edit(
    doc: &mut StructuredDocument,
    event: &EditEvent,
    selection: Selection,
    style: Option<InlineStyle>,
) -> Selection {
    let sel = doc.clamp_selection(selection);
    let caret = match event {
        EditEvent::InsertText(text) | EditEvent::InsertFromPaste(text) => {
            execute_insert(doc, text, sel, style)
        }
        EditEvent::InsertParagraph => execute_insert_paragraph(doc, sel),
        EditEvent::DeleteContentBackward => execute_delete_backward(doc, sel),
        EditEvent::DeleteContentForward => execute_delete_forward(doc, sel),
        EditEvent::DeleteWordBackward => execute_delete_word_backward(doc, sel),
        EditEvent::DeleteWordForward => execute_delete_word_forward(doc, sel),
    };
    Selection::collapsed(caret)
}

/// Delete the selection if it is not collapsed. Returns the caret.
fn delete_selection(doc: &mut StructuredDocument, sel: Selection) -> Position {
    if sel.is_collapsed() {
        sel.focus
    } else {
        doc.delete_range(sel.start(), sel.end())
    }
}

/// Style and link that text typed at `at` picks up from its neighbours.
fn inherited_format(
    doc: &StructuredDocument,
    at: Position,
) -> (InlineStyle, Option<smol_str::SmolStr>) {
    let Some(block) = doc.block(at.block) else {
        return (InlineStyle::PLAIN, None);
    };
    let style = block
        .run_before(at.offset)
        .map(|run| run.style)
        .unwrap_or_default();
    let link = block
        .run_surrounding(at.offset)
        .and_then(|run| run.link.clone());
    (style, link)
}

/// Kind of the block created when `kind` is split by Enter.
fn continuation_kind(kind: BlockKind) -> BlockKind {
    match kind {
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => BlockKind::Paragraph,
        other => other,
    }
}

fn execute_insert(
    doc: &mut StructuredDocument,
    text: &str,
    sel: Selection,
    style: Option<InlineStyle>,
) -> Position {
    let mut at = delete_selection(doc, sel);
    let (style, link) = match style {
        Some(style) => (style, None),
        None => inherited_format(doc, at),
    };

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            let kind = doc.block(at.block).map(|b| b.kind).unwrap_or_default();
            at = doc.split_block(at, continuation_kind(kind));
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let run = TextRun {
            text: line.to_string(),
            style,
            link: link.clone(),
        };
        doc.block_mut(at.block).insert_run(at.offset, run);
        at.offset += line.chars().count();
    }
    at
}

fn execute_insert_paragraph(doc: &mut StructuredDocument, sel: Selection) -> Position {
    let at = delete_selection(doc, sel);
    let block = doc.block_mut(at.block);
    if block.kind.is_list() && block.is_empty() {
        // Empty item: exit the list.
        block.kind = BlockKind::Paragraph;
        return at;
    }
    let kind = continuation_kind(block.kind);
    doc.split_block(at, kind)
}

fn execute_delete_backward(doc: &mut StructuredDocument, sel: Selection) -> Position {
    if !sel.is_collapsed() {
        return delete_selection(doc, sel);
    }
    let at = sel.focus;
    if at.offset > 0 {
        doc.block_mut(at.block)
            .delete_range(at.offset - 1, at.offset);
        return Position::new(at.block, at.offset - 1);
    }
    if at.block > 0 {
        let prev = at.block - 1;
        let prev_len = doc.block(prev).map(|b| b.len_chars()).unwrap_or(0);
        doc.merge_with_next(prev);
        return Position::new(prev, prev_len);
    }
    let block = doc.block_mut(0);
    if block.kind != BlockKind::Paragraph {
        block.kind = BlockKind::Paragraph;
        block.normalize();
    }
    at
}

fn execute_delete_forward(doc: &mut StructuredDocument, sel: Selection) -> Position {
    if !sel.is_collapsed() {
        return delete_selection(doc, sel);
    }
    let at = sel.focus;
    let block = doc.block_mut(at.block);
    if at.offset < block.len_chars() {
        block.delete_range(at.offset, at.offset + 1);
    } else {
        doc.merge_with_next(at.block);
    }
    at
}

fn execute_delete_word_backward(doc: &mut StructuredDocument, sel: Selection) -> Position {
    if !sel.is_collapsed() || sel.focus.offset == 0 {
        return execute_delete_backward(doc, sel);
    }
    let at = sel.focus;
    let block = doc.block_mut(at.block);
    let start = find_word_boundary_backward(&block.chars(), at.offset);
    block.delete_range(start, at.offset);
    Position::new(at.block, start)
}

fn execute_delete_word_forward(doc: &mut StructuredDocument, sel: Selection) -> Position {
    let at = sel.focus;
    let len = doc.block(at.block).map(|b| b.len_chars()).unwrap_or(0);
    if !sel.is_collapsed() || at.offset >= len {
        return execute_delete_forward(doc, sel);
    }
    let block = doc.block_mut(at.block);
    let end = find_word_boundary_forward(&block.chars(), at.offset);
    block.delete_range(at.offset, end);
    at
}
