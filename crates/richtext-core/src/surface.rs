//! The editable surface: sole owner of the live [`StructuredDocument`].

use crate::actions::{EditEvent, FormatCommand};
use crate::document::{InlineStyle, StructuredDocument};
use crate::execute::{execute_command, execute_edit};
use crate::types::{Position, Selection};

/// Inline style toggled at a collapsed caret, applied to the next text typed
/// there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingStyle {
    pub at: Position,
    pub style: InlineStyle,
}

/// Result of applying a user edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    /// Whether the tree changed.
    pub changed: bool,
    /// Caret after the edit.
    pub selection: Selection,
}

#[derive(Clone, Debug, Default)]
pub struct DocumentSurface {
    doc: StructuredDocument,
    pending: Option<PendingStyle>,
}

impl DocumentSurface {
    pub fn new(doc: StructuredDocument) -> Self {
        Self { doc, pending: None }
    }

    pub fn document(&self) -> &StructuredDocument {
        &self.doc
    }

    pub fn pending(&self) -> Option<&PendingStyle> {
        self.pending.as_ref()
    }

    /// Drop the pending style unless it sits at `caret`.
    pub fn retain_pending_at(&mut self, caret: Position) {
        if self.pending.is_some_and(|p| p.at != caret) {
            tracing::trace!(%caret, "caret moved, dropping pending style");
            self.pending = None;
        }
    }

    /// Apply a direct user edit.
    pub fn apply_user_input(&mut self, event: &EditEvent, selection: Selection) -> EditOutcome {
        let sel = self.doc.clamp_selection(selection);
        let pending = self
            .pending
            .take()
            .filter(|p| sel.is_collapsed() && p.at == sel.focus && event.is_insertion());
        let before = self.doc.clone();
        let selection = match (event, pending) {
            // A paragraph break carries the pending style to the new caret.
            (EditEvent::InsertParagraph, Some(p)) => {
                let selection = execute_edit(&mut self.doc, event, sel, None);
                self.pending = Some(PendingStyle {
                    at: selection.focus,
                    style: p.style,
                });
                selection
            }
            _ => execute_edit(&mut self.doc, event, sel, pending.map(|p| p.style)),
        };
        EditOutcome {
            changed: self.doc != before,
            selection,
        }
    }

    /// Apply a formatting command. Returns whether the tree changed.
    ///
    /// Inline toggles at a collapsed caret only update the pending style.
    pub fn apply_command(
        &mut self,
        command: FormatCommand,
        selection: Selection,
        argument: Option<&str>,
    ) -> bool {
        let sel = self.doc.clamp_selection(selection);
        if let Some(flag) = command.inline_flag() {
            if sel.is_collapsed() {
                let base = match self.pending {
                    Some(p) if p.at == sel.focus => p.style,
                    _ => self.caret_style(sel.focus),
                };
                self.pending = Some(PendingStyle {
                    at: sel.focus,
                    style: base.toggled(flag),
                });
                tracing::debug!(%command, caret = %sel.focus, "pending caret style");
                return false;
            }
        }
        let changed = execute_command(&mut self.doc, command, sel, argument);
        if changed {
            self.pending = None;
        }
        changed
    }

    /// Replace the whole document. Any pending style is dropped.
    pub fn replace(&mut self, doc: StructuredDocument) {
        self.doc.replace(doc);
        self.pending = None;
    }

    /// Inline style of the text just before `caret`.
    pub fn caret_style(&self, caret: Position) -> InlineStyle {
        self.doc
            .block(caret.block)
            .and_then(|block| block.run_before(caret.offset))
            .map(|run| run.style)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{decode, encode};

    #[test]
    fn test_pending_bold_applies_to_typed_text() {
        let mut surface = DocumentSurface::default();
        let caret = Selection::caret(0, 0);
        assert!(!surface.apply_command(FormatCommand::Bold, caret, None));
        assert!(surface.pending().is_some_and(|p| p.style.bold));

        let outcome = surface.apply_user_input(&EditEvent::InsertText("hi".into()), caret);
        assert!(outcome.changed);
        assert_eq!(outcome.selection, Selection::caret(0, 2));
        assert_eq!(encode(surface.document()), "<p><strong>hi</strong></p>");
        assert!(surface.pending().is_none());
    }

    #[test]
    fn test_pending_style_survives_paragraph_break() {
        let mut surface = DocumentSurface::new(decode("<p>ab</p>"));
        surface.apply_command(FormatCommand::Bold, Selection::caret(0, 2), None);

        let split = surface.apply_user_input(&EditEvent::InsertParagraph, Selection::caret(0, 2));
        assert_eq!(split.selection, Selection::caret(1, 0));
        assert_eq!(
            surface.pending().map(|p| p.at),
            Some(Position::new(1, 0))
        );

        surface.apply_user_input(&EditEvent::InsertText("x".into()), split.selection);
        assert_eq!(
            encode(surface.document()),
            "<p>ab</p><p><strong>x</strong></p>"
        );
    }

    #[test]
    fn test_pending_toggles_twice_back_to_plain() {
        let mut surface = DocumentSurface::new(decode("<p><em>ab</em></p>"));
        let caret = Selection::caret(0, 2);
        surface.apply_command(FormatCommand::Italic, caret, None);
        assert_eq!(surface.pending().map(|p| p.style), Some(InlineStyle::PLAIN));
        surface.apply_command(FormatCommand::Italic, caret, None);
        assert!(surface.pending().is_some_and(|p| p.style.italic));
    }

    #[test]
    fn test_pending_dropped_when_caret_moves() {
        let mut surface = DocumentSurface::new(decode("<p>abc</p>"));
        surface.apply_command(FormatCommand::Bold, Selection::caret(0, 1), None);
        surface.retain_pending_at(Position::new(0, 1));
        assert!(surface.pending().is_some());
        surface.retain_pending_at(Position::new(0, 3));
        assert!(surface.pending().is_none());

        surface.apply_command(FormatCommand::Bold, Selection::caret(0, 1), None);
        surface.apply_user_input(&EditEvent::InsertText("X".into()), Selection::caret(0, 3));
        assert_eq!(encode(surface.document()), "<p>abcX</p>");
    }

    #[test]
    fn test_unchanged_input_reports_no_change() {
        let mut surface = DocumentSurface::new(decode("<p>a</p>"));
        let outcome =
            surface.apply_user_input(&EditEvent::DeleteContentBackward, Selection::caret(0, 0));
        assert!(!outcome.changed);
    }

    #[test]
    fn test_replace_clears_pending() {
        let mut surface = DocumentSurface::default();
        surface.apply_command(FormatCommand::Underlined, Selection::caret(0, 0), None);
        surface.replace(decode("<p>new</p>"));
        assert!(surface.pending().is_none());
        assert_eq!(surface.document().plain_text(), "new");
    }
}
