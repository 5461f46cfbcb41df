//! Toolbar presentation and activation.
//!
//! The toolbar is a pure projection of [`FormatState`]: one item per
//! [`FormatCommand`], grouped the way the buttons are laid out. Activation
//! routes straight into [`RichTextEditor::dispatch`]; the link command first
//! asks a [`LinkPrompt`] for the URL.

use crate::actions::FormatCommand;
use crate::bridge::ChangeSink;
use crate::editor::RichTextEditor;
use crate::observer::FormatState;

/// Blocking source of a link URL. `None` means the user cancelled.
pub trait LinkPrompt {
    fn prompt_url(&mut self, message: &str) -> Option<String>;
}

impl<F> LinkPrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn prompt_url(&mut self, message: &str) -> Option<String> {
        self(message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolbarItem {
    pub command: FormatCommand,
    pub label: &'static str,
    /// Icon identifier (lucide icon names).
    pub icon: &'static str,
    pub active: bool,
}

const GROUPS: [&[FormatCommand]; 3] = [
    &[
        FormatCommand::Heading1,
        FormatCommand::Heading2,
        FormatCommand::Heading3,
    ],
    &[
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underlined,
    ],
    &[
        FormatCommand::UnorderedList,
        FormatCommand::OrderedList,
        FormatCommand::Link,
        FormatCommand::Blockquote,
        FormatCommand::CodeBlock,
    ],
];

fn label(command: FormatCommand) -> &'static str {
    match command {
        FormatCommand::Bold => "Bold",
        FormatCommand::Italic => "Italic",
        FormatCommand::Underlined => "Underline",
        FormatCommand::Heading1 => "Heading 1",
        FormatCommand::Heading2 => "Heading 2",
        FormatCommand::Heading3 => "Heading 3",
        FormatCommand::UnorderedList => "Bullet list",
        FormatCommand::OrderedList => "Numbered list",
        FormatCommand::Blockquote => "Quote",
        FormatCommand::CodeBlock => "Code block",
        FormatCommand::Link => "Link",
    }
}

fn icon(command: FormatCommand) -> &'static str {
    match command {
        FormatCommand::Bold => "bold",
        FormatCommand::Italic => "italic",
        FormatCommand::Underlined => "underline",
        FormatCommand::Heading1 => "heading-1",
        FormatCommand::Heading2 => "heading-2",
        FormatCommand::Heading3 => "heading-3",
        FormatCommand::UnorderedList => "list",
        FormatCommand::OrderedList => "list-ordered",
        FormatCommand::Blockquote => "quote",
        FormatCommand::CodeBlock => "code",
        FormatCommand::Link => "link",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolbar {
    pub groups: Vec<Vec<ToolbarItem>>,
}

impl Toolbar {
    /// Project a format state onto toolbar items.
    pub fn present(state: &FormatState) -> Self {
        let groups = GROUPS
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|&command| ToolbarItem {
                        command,
                        label: label(command),
                        icon: icon(command),
                        active: state.is_active(command),
                    })
                    .collect()
            })
            .collect();
        Self { groups }
    }

    pub fn items(&self) -> impl Iterator<Item = &ToolbarItem> {
        self.groups.iter().flatten()
    }

    pub fn item(&self, command: FormatCommand) -> Option<&ToolbarItem> {
        self.items().find(|item| item.command == command)
    }

    /// Activate a toolbar item against the editor's current selection.
    ///
    /// Returns whether the document changed.
    pub fn activate<S, P>(
        command: FormatCommand,
        editor: &mut RichTextEditor<S>,
        prompt: &mut P,
    ) -> bool
    where
        S: ChangeSink,
        P: LinkPrompt + ?Sized,
    {
        if command != FormatCommand::Link {
            return editor.dispatch(command, None);
        }
        let message = editor.config().link_prompt.clone();
        match prompt.prompt_url(&message) {
            Some(url) if !url.trim().is_empty() => editor.dispatch(command, Some(&url)),
            _ => {
                tracing::debug!("link prompt cancelled");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ActiveBlock;

    #[test]
    fn test_present_covers_every_command_once() {
        let toolbar = Toolbar::present(&FormatState::default());
        let commands: std::collections::HashSet<_> =
            toolbar.items().map(|item| item.command).collect();
        assert_eq!(toolbar.items().count(), FormatCommand::ALL.len());
        assert!(FormatCommand::ALL.iter().all(|c| commands.contains(c)));
        assert_eq!(toolbar.groups.len(), 3);
        assert!(toolbar.items().all(|item| !item.active));
    }

    #[test]
    fn test_present_highlights_active() {
        let state = FormatState {
            bold: true,
            heading_level: 3,
            block_kind: ActiveBlock::CodeBlock,
            ..FormatState::default()
        };
        let toolbar = Toolbar::present(&state);
        let active: Vec<_> = toolbar
            .items()
            .filter(|item| item.active)
            .map(|item| item.label)
            .collect();
        assert_eq!(active, vec!["Heading 3", "Bold", "Code block"]);
        assert_eq!(toolbar.item(FormatCommand::Link).map(|i| i.icon), Some("link"));
    }
}
