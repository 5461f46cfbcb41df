//! Active-format projection of a selection.

use serde::{Deserialize, Serialize};

use crate::actions::FormatCommand;
use crate::document::{BlockKind, InlineFlag, InlineStyle, StructuredDocument};
use crate::execute::uniform_flag;
use crate::surface::PendingStyle;
use crate::types::{Position, Selection};

/// Block-level highlight that is neither a heading nor a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveBlock {
    #[default]
    Paragraph,
    Blockquote,
    CodeBlock,
}

/// Which formats are active for the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub unordered_list: bool,
    pub ordered_list: bool,
    /// 0 when the anchor block is not a heading.
    pub heading_level: u8,
    pub block_kind: ActiveBlock,
}

impl FormatState {
    /// Whether the toolbar item for `command` should be highlighted.
    pub fn is_active(&self, command: FormatCommand) -> bool {
        match command {
            FormatCommand::Bold => self.bold,
            FormatCommand::Italic => self.italic,
            FormatCommand::Underlined => self.underline,
            FormatCommand::Heading1 => self.heading_level == 1,
            FormatCommand::Heading2 => self.heading_level == 2,
            FormatCommand::Heading3 => self.heading_level == 3,
            FormatCommand::UnorderedList => self.unordered_list,
            FormatCommand::OrderedList => self.ordered_list,
            FormatCommand::Blockquote => self.block_kind == ActiveBlock::Blockquote,
            FormatCommand::CodeBlock => self.block_kind == ActiveBlock::CodeBlock,
            FormatCommand::Link => false,
        }
    }
}

/// Compute the format state for a selection.
pub fn observe(
    doc: &StructuredDocument,
    selection: Selection,
    pending: Option<&PendingStyle>,
) -> FormatState {
    let sel = doc.clamp_selection(selection);
    let kind = doc
        .block(sel.anchor.block)
        .map(|block| block.kind)
        .unwrap_or_default();
    let style = if kind.allows_inline_style() {
        inline_state(doc, sel, pending)
    } else {
        InlineStyle::PLAIN
    };

    FormatState {
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        unordered_list: kind == BlockKind::UnorderedList,
        ordered_list: kind == BlockKind::OrderedList,
        heading_level: kind.heading_level(),
        block_kind: match kind {
            BlockKind::Blockquote => ActiveBlock::Blockquote,
            BlockKind::CodeBlock => ActiveBlock::CodeBlock,
            _ => ActiveBlock::Paragraph,
        },
    }
}

fn inline_state(
    doc: &StructuredDocument,
    sel: Selection,
    pending: Option<&PendingStyle>,
) -> InlineStyle {
    if sel.is_collapsed() {
        if let Some(p) = pending.filter(|p| p.at == sel.focus) {
            return p.style;
        }
        return caret_style(doc, sel.anchor);
    }

    let flag = |flag| uniform_flag(doc, flag, sel);
    match (
        flag(InlineFlag::Bold),
        flag(InlineFlag::Italic),
        flag(InlineFlag::Underline),
    ) {
        (Some(bold), Some(italic), Some(underline)) => InlineStyle {
            bold,
            italic,
            underline,
        },
        // Nothing styleable covered.
        _ => caret_style(doc, sel.start()),
    }
}

fn caret_style(doc: &StructuredDocument, at: Position) -> InlineStyle {
    doc.block(at.block)
        .filter(|block| block.kind.allows_inline_style())
        .and_then(|block| block.run_before(at.offset))
        .map(|run| run.style)
        .unwrap_or_default()
}
