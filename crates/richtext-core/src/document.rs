//! The structured document model.
//!
//! A [`StructuredDocument`] is an owned, acyclic sequence of [`Block`]s, each
//! holding a flat list of [`TextRun`]s. There are no back-pointers: anything
//! that needs to refer into the tree does so with a [`Position`] path.
//!
//! Every mutating helper leaves the touched blocks normalised:
//! - no empty runs
//! - adjacent runs with the same style and link are merged
//! - runs inside code blocks carry neither style nor link
//!
//! The markup codec relies on this to make `decode(encode(d)) == d` hold.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::{Position, Selection};

/// One of the inline style flags a run can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InlineFlag {
    Bold,
    Italic,
    Underline,
}

/// Inline style flags of a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl InlineStyle {
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }

    pub fn get(&self, flag: InlineFlag) -> bool {
        match flag {
            InlineFlag::Bold => self.bold,
            InlineFlag::Italic => self.italic,
            InlineFlag::Underline => self.underline,
        }
    }

    pub fn set(&mut self, flag: InlineFlag, value: bool) {
        match flag {
            InlineFlag::Bold => self.bold = value,
            InlineFlag::Italic => self.italic = value,
            InlineFlag::Underline => self.underline = value,
        }
    }

    /// Copy of this style with `flag` flipped.
    pub fn toggled(mut self, flag: InlineFlag) -> Self {
        let value = self.get(flag);
        self.set(flag, !value);
        self
    }

    /// Copy of this style with `flag` set.
    pub fn with(mut self, flag: InlineFlag) -> Self {
        self.set(flag, true);
        self
    }
}

/// A leaf run of text with uniform formatting.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub style: InlineStyle,
    /// Link target wrapping this run, if any.
    pub link: Option<SmolStr>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::PLAIN,
            link: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }

    pub fn with_link(mut self, href: impl Into<SmolStr>) -> Self {
        self.link = Some(href.into());
        self
    }

    /// Length in chars (Unicode scalar values).
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether two runs would encode with identical wrappers.
    pub fn same_format(&self, other: &TextRun) -> bool {
        self.style == other.style && self.link == other.link
    }
}

/// The kind of a block. Every block has exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    /// Item of an unordered list.
    UnorderedList,
    /// Item of an ordered list.
    OrderedList,
    Blockquote,
    CodeBlock,
}

impl BlockKind {
    /// Heading kind for a level in `1..=3`.
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Heading1),
            2 => Some(Self::Heading2),
            3 => Some(Self::Heading3),
            _ => None,
        }
    }

    /// Heading level, or 0 for non-heading blocks.
    pub fn heading_level(self) -> u8 {
        match self {
            Self::Heading1 => 1,
            Self::Heading2 => 2,
            Self::Heading3 => 3,
            _ => 0,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Self::UnorderedList | Self::OrderedList)
    }

    /// Whether runs in this block may carry inline styling.
    pub fn allows_inline_style(self) -> bool {
        self != Self::CodeBlock
    }
}

/// A block node: one kind, a sequence of inline runs.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub runs: Vec<TextRun>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            runs: Vec::new(),
        }
    }

    pub fn with_runs(kind: BlockKind, runs: Vec<TextRun>) -> Self {
        let mut block = Self { kind, runs };
        block.normalize();
        block
    }

    /// A paragraph holding a single plain run.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::with_runs(BlockKind::Paragraph, vec![TextRun::plain(text)])
    }

    pub fn len_chars(&self) -> usize {
        self.runs.iter().map(TextRun::len_chars).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Re-establish the run invariants for this block.
    pub fn normalize(&mut self) {
        let strip = !self.kind.allows_inline_style();
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for mut run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            if strip {
                run.style = InlineStyle::PLAIN;
                run.link = None;
            }
            match merged.last_mut() {
                Some(prev) if prev.same_format(&run) => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    /// The run holding the character just before `offset`, or the first
    /// run when `offset` is 0.
    pub fn run_before(&self, offset: usize) -> Option<&TextRun> {
        if offset == 0 {
            return self.runs.first();
        }
        let mut acc = 0;
        for run in &self.runs {
            let len = run.len_chars();
            if offset <= acc + len {
                return Some(run);
            }
            acc += len;
        }
        self.runs.last()
    }

    /// The run strictly containing `offset` (not at one of its edges).
    pub fn run_surrounding(&self, offset: usize) -> Option<&TextRun> {
        let mut acc = 0;
        for run in &self.runs {
            let len = run.len_chars();
            if offset > acc && offset < acc + len {
                return Some(run);
            }
            acc += len;
        }
        None
    }

    /// Runs overlapping the char range `start..end`, with at least one
    /// covered character each.
    pub fn covered_runs(&self, start: usize, end: usize) -> impl Iterator<Item = &TextRun> {
        let mut acc = 0;
        self.runs.iter().filter(move |run| {
            let run_start = acc;
            acc += run.len_chars();
            run_start < end && acc > start
        })
    }

    /// Split runs so that a run boundary falls exactly at `offset`.
    ///
    /// Returns the index of the first run at or after `offset`. Leaves the
    /// block non-normalised until the caller normalises it again.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut acc = 0;
        for i in 0..self.runs.len() {
            if offset == acc {
                return i;
            }
            let len = self.runs[i].len_chars();
            if offset < acc + len {
                let byte = char_to_byte(&self.runs[i].text, offset - acc);
                let tail = self.runs[i].text.split_off(byte);
                let new_run = TextRun {
                    text: tail,
                    style: self.runs[i].style,
                    link: self.runs[i].link.clone(),
                };
                self.runs.insert(i + 1, new_run);
                return i + 1;
            }
            acc += len;
        }
        self.runs.len()
    }

    /// Insert a run at `offset`.
    pub fn insert_run(&mut self, offset: usize, run: TextRun) {
        let offset = offset.min(self.len_chars());
        let index = self.split_at(offset);
        self.runs.insert(index, run);
        self.normalize();
    }

    /// Delete the char range `start..end`.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.drain(first..last);
        self.normalize();
    }

    /// Apply `f` to every run inside `start..end`, splitting at the edges.
    pub fn update_range<F: FnMut(&mut TextRun)>(&mut self, start: usize, end: usize, mut f: F) {
        let len = self.len_chars();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            f(run);
        }
        self.normalize();
    }

    /// Remove and return all runs from `offset` to the end.
    pub fn split_off(&mut self, offset: usize) -> Vec<TextRun> {
        let offset = offset.min(self.len_chars());
        let index = self.split_at(offset);
        let tail = self.runs.split_off(index);
        self.normalize();
        tail
    }

    /// Characters of the block text, for boundary scans.
    pub fn chars(&self) -> Vec<char> {
        self.runs.iter().flat_map(|r| r.text.chars()).collect()
    }
}

/// Byte index of the `char_offset`-th char in `s` (or `s.len()`).
pub(crate) fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// In-memory tree of formatted text. Always holds at least one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    blocks: Vec<Block>,
}

impl Default for StructuredDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredDocument {
    /// An empty document: a single empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Paragraph)],
        }
    }

    /// Build a document from blocks, normalising them.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut doc = Self { blocks };
        doc.normalize();
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// True for the single-empty-paragraph document.
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1
            && self.blocks[0].kind == BlockKind::Paragraph
            && self.blocks[0].is_empty()
    }

    /// Plain text of the document, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn normalize(&mut self) {
        for block in &mut self.blocks {
            block.normalize();
        }
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockKind::Paragraph));
        }
    }

    /// Position at the very end of the document.
    pub fn end_position(&self) -> Position {
        let block = self.blocks.len() - 1;
        Position::new(block, self.blocks[block].len_chars())
    }

    /// Clamp a possibly stale position to the nearest valid one.
    pub fn clamp(&self, pos: Position) -> Position {
        if pos.block >= self.blocks.len() {
            return self.end_position();
        }
        Position::new(pos.block, pos.offset.min(self.blocks[pos.block].len_chars()))
    }

    pub fn clamp_selection(&self, sel: Selection) -> Selection {
        Selection::new(self.clamp(sel.anchor), self.clamp(sel.focus))
    }

    /// Per-block char ranges covered by a selection, in document order.
    ///
    /// Every touched block yields a segment, possibly empty (a caret, or the
    /// end of one block followed by the start of the next).
    pub fn covered_segments(&self, sel: Selection) -> Vec<(usize, Range<usize>)> {
        let (start, end) = (self.clamp(sel.start()), self.clamp(sel.end()));
        (start.block..=end.block)
            .map(|index| {
                let from = if index == start.block { start.offset } else { 0 };
                let to = if index == end.block {
                    end.offset
                } else {
                    self.blocks[index].len_chars()
                };
                (index, from..to)
            })
            .collect()
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Delete everything between two positions, returning the collapsed
    /// position where the deletion happened.
    pub fn delete_range(&mut self, start: Position, end: Position) -> Position {
        let (start, end) = (self.clamp(start.min(end)), self.clamp(start.max(end)));
        if start.block == end.block {
            self.blocks[start.block].delete_range(start.offset, end.offset);
            return start;
        }
        let tail = self.blocks[end.block].split_off(end.offset);
        let first = &mut self.blocks[start.block];
        let first_len = first.len_chars();
        first.delete_range(start.offset, first_len);
        first.runs.extend(tail);
        first.normalize();
        self.blocks.drain(start.block + 1..=end.block);
        start
    }

    /// Split the block at `pos`; the tail moves into a new block of `kind`
    /// inserted right after. Returns the start of the new block.
    pub fn split_block(&mut self, pos: Position, kind: BlockKind) -> Position {
        let pos = self.clamp(pos);
        let tail = self.blocks[pos.block].split_off(pos.offset);
        self.blocks
            .insert(pos.block + 1, Block::with_runs(kind, tail));
        Position::new(pos.block + 1, 0)
    }

    /// Append the block after `index` onto it. Returns false if there is no
    /// next block.
    pub fn merge_with_next(&mut self, index: usize) -> bool {
        if index + 1 >= self.blocks.len() {
            return false;
        }
        let next = self.blocks.remove(index + 1);
        let block = &mut self.blocks[index];
        block.runs.extend(next.runs);
        block.normalize();
        true
    }

    /// Replace the whole content.
    pub fn replace(&mut self, other: StructuredDocument) {
        *self = other;
        self.normalize();
    }
}
