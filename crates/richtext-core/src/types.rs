//! Core editor types: positions and selections.
//!
//! Positions are paths from the document root rather than references into
//! the tree, so they stay valid values even when the document they were taken
//! from has been replaced. Use [`crate::StructuredDocument::clamp`] to bring a
//! stale position back into range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PositionParseError;

/// A caret position inside a document.
///
/// Ordering is document order: by block first, then by offset.
#[derive(Clone, Debug, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Index of the block, counted from the document root.
    pub block: usize,
    /// Character offset inside the block text (NOT byte offset!)
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    /// Parse the `block:offset` form used by [`Position`]'s `Display` impl.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (block, offset) = s
            .split_once(':')
            .ok_or_else(|| PositionParseError::MissingSeparator(s.to_string()))?;
        let block = block
            .trim()
            .parse()
            .map_err(|_| PositionParseError::InvalidNumber(block.to_string()))?;
        let offset = offset
            .trim()
            .parse()
            .map_err(|_| PositionParseError::InvalidNumber(offset.to_string()))?;
        Ok(Self { block, offset })
    }
}

/// Text selection with anchor and focus positions.
///
/// The anchor is where the selection started, the focus is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Where selection started
    pub anchor: Position,
    /// Where cursor is now
    pub focus: Position,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// Shorthand for a collapsed selection at `block:offset`.
    pub fn caret(block: usize, offset: usize) -> Self {
        Self::collapsed(Position::new(block, offset))
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> Position {
        self.anchor.min(self.focus)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> Position {
        self.anchor.max(self.focus)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Check if the selection is backwards (focus before anchor).
    pub fn is_backwards(&self) -> bool {
        self.focus < self.anchor
    }

    /// Range of block indices touched by the selection.
    pub fn blocks(&self) -> std::ops::RangeInclusive<usize> {
        self.start().block..=self.end().block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds() {
        // Forward selection
        let sel = Selection::new(Position::new(0, 5), Position::new(1, 2));
        assert_eq!(sel.start(), Position::new(0, 5));
        assert_eq!(sel.end(), Position::new(1, 2));
        assert!(!sel.is_backwards());

        // Backward selection
        let sel = Selection::new(Position::new(1, 2), Position::new(0, 5));
        assert_eq!(sel.start(), Position::new(0, 5));
        assert_eq!(sel.end(), Position::new(1, 2));
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::caret(2, 7);
        assert!(sel.is_collapsed());
        assert_eq!(sel.start(), sel.end());
        assert_eq!(sel.blocks(), 2..=2);
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 99) < Position::new(1, 0));
        assert!(Position::new(3, 1) < Position::new(3, 2));
    }

    #[test]
    fn test_position_parse() {
        assert_eq!("2:14".parse::<Position>().unwrap(), Position::new(2, 14));
        assert_eq!(Position::new(0, 3).to_string(), "0:3");
        assert!(matches!(
            "12".parse::<Position>(),
            Err(PositionParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "a:1".parse::<Position>(),
            Err(PositionParseError::InvalidNumber(_))
        ));
    }
}
