//! Editor commands and input events.
//!
//! Platform-agnostic definitions for editor operations. [`FormatCommand`] is
//! the closed set of formatting commands a toolbar can issue, while
//! [`EditEvent`] represents the semantic intent of direct user input (browser
//! `beforeinput`, native input methods, scripted input).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{BlockKind, InlineFlag};
use crate::error::UnknownCommand;

/// All formatting commands the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underlined,
    #[serde(rename = "heading-1")]
    Heading1,
    #[serde(rename = "heading-2")]
    Heading2,
    #[serde(rename = "heading-3")]
    Heading3,
    UnorderedList,
    OrderedList,
    Blockquote,
    CodeBlock,
    /// Wrap the selection in a link. Needs a URL argument.
    Link,
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 11] = [
        Self::Bold,
        Self::Italic,
        Self::Underlined,
        Self::Heading1,
        Self::Heading2,
        Self::Heading3,
        Self::UnorderedList,
        Self::OrderedList,
        Self::Blockquote,
        Self::CodeBlock,
        Self::Link,
    ];

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underlined => "underlined",
            Self::Heading1 => "heading-1",
            Self::Heading2 => "heading-2",
            Self::Heading3 => "heading-3",
            Self::UnorderedList => "unordered-list",
            Self::OrderedList => "ordered-list",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "code-block",
            Self::Link => "link",
        }
    }

    /// The inline flag this command toggles, if it is an inline style command.
    pub fn inline_flag(self) -> Option<InlineFlag> {
        match self {
            Self::Bold => Some(InlineFlag::Bold),
            Self::Italic => Some(InlineFlag::Italic),
            Self::Underlined => Some(InlineFlag::Underline),
            _ => None,
        }
    }

    /// The block kind this command converts blocks to, if it is a block command.
    pub fn block_kind(self) -> Option<BlockKind> {
        match self {
            Self::Heading1 => Some(BlockKind::Heading1),
            Self::Heading2 => Some(BlockKind::Heading2),
            Self::Heading3 => Some(BlockKind::Heading3),
            Self::UnorderedList => Some(BlockKind::UnorderedList),
            Self::OrderedList => Some(BlockKind::OrderedList),
            Self::Blockquote => Some(BlockKind::Blockquote),
            Self::CodeBlock => Some(BlockKind::CodeBlock),
            _ => None,
        }
    }

    /// Whether the command needs an argument (a URL for [`FormatCommand::Link`]).
    pub fn takes_argument(self) -> bool {
        self == Self::Link
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormatCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_ascii_lowercase().as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underlined" | "underline" => Self::Underlined,
            "heading-1" | "h1" => Self::Heading1,
            "heading-2" | "h2" => Self::Heading2,
            "heading-3" | "h3" => Self::Heading3,
            "unordered-list" | "ul" => Self::UnorderedList,
            "ordered-list" | "ol" => Self::OrderedList,
            "blockquote" | "quote" => Self::Blockquote,
            "code-block" | "code" => Self::CodeBlock,
            "link" => Self::Link,
            _ => return Err(UnknownCommand(s.to_string())),
        };
        Ok(command)
    }
}

/// Semantic input events performed directly on the surface.
///
/// Based on the W3C Input Events input types, restricted to the ones a
/// single-surface editor without history needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditEvent {
    /// Insert typed text, replacing the selection.
    InsertText(String),
    /// Insert from paste. Newlines become block breaks.
    InsertFromPaste(String),
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    /// Delete word backward (Ctrl/Alt+Backspace).
    DeleteWordBackward,
    /// Delete word forward (Ctrl/Alt+Delete).
    DeleteWordForward,
}

impl EditEvent {
    pub fn is_insertion(&self) -> bool {
        matches!(
            self,
            Self::InsertText(_) | Self::InsertFromPaste(_) | Self::InsertParagraph
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_roundtrip() {
        for command in FormatCommand::ALL {
            assert_eq!(command.name().parse::<FormatCommand>(), Ok(command));
        }
    }

    #[test]
    fn test_command_aliases() {
        assert_eq!("H2".parse(), Ok(FormatCommand::Heading2));
        assert_eq!(" ul ".parse(), Ok(FormatCommand::UnorderedList));
        assert_eq!("underline".parse(), Ok(FormatCommand::Underlined));
        assert_eq!(
            "strike".parse::<FormatCommand>(),
            Err(UnknownCommand("strike".into()))
        );
    }

    #[test]
    fn test_command_categories() {
        assert_eq!(FormatCommand::Bold.inline_flag(), Some(InlineFlag::Bold));
        assert_eq!(FormatCommand::Bold.block_kind(), None);
        assert_eq!(
            FormatCommand::CodeBlock.block_kind(),
            Some(BlockKind::CodeBlock)
        );
        assert!(FormatCommand::Link.takes_argument());
        assert!(FormatCommand::Link.inline_flag().is_none());
    }
}
