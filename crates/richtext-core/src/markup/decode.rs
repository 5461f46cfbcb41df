//! Markup → [`StructuredDocument`].
//!
//! Best effort: the event stream from [`Parser`] is folded into blocks with a
//! small amount of context (open containers, open inline wrappers). Tags we
//! do not model are transparent, so their text survives as plain runs.

use smol_str::SmolStr;

use super::parser::{MarkupEvent, Parser};
use crate::document::{Block, BlockKind, InlineFlag, InlineStyle, StructuredDocument, TextRun};

/// Decode a markup string. Never fails.
pub fn decode(markup: &str) -> StructuredDocument {
    let mut builder = DocumentBuilder::default();
    for event in Parser::new(markup) {
        builder.event(event);
    }
    builder.finish()
}

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    List(BlockKind),
    Quote,
}

#[derive(Debug, Clone)]
enum Effect {
    Style(InlineFlag),
    Link(Option<SmolStr>),
    Transparent,
}

#[derive(Debug, Clone)]
struct InlineFrame {
    name: SmolStr,
    effect: Effect,
}

#[derive(Default)]
struct DocumentBuilder {
    blocks: Vec<Block>,
    current: Option<Block>,
    containers: Vec<Container>,
    inline: Vec<InlineFrame>,
    /// A `<br>` was seen inside a non-empty block.
    break_pending: bool,
}

impl DocumentBuilder {
    fn event(&mut self, event: MarkupEvent<'_>) {
        let href = event.attr("href").map(SmolStr::new);
        match event {
            MarkupEvent::Text(text) => self.text(&text),
            MarkupEvent::End { name } => self.end(&name),
            MarkupEvent::Start {
                name, self_closing, ..
            } => self.start(&name, href, self_closing),
        }
    }

    fn start(&mut self, name: &str, href: Option<SmolStr>, self_closing: bool) {
        match name {
            "p" | "div" | "h4" | "h5" | "h6" => {
                let kind = self.context_kind();
                self.open_block(kind);
            }
            "h1" | "h2" | "h3" => {
                let level = name.as_bytes()[1] - b'0';
                let kind = BlockKind::heading(level).unwrap_or_default();
                self.open_block(kind);
            }
            "pre" => self.open_block(BlockKind::CodeBlock),
            "li" => {
                let kind = self.list_kind().unwrap_or(BlockKind::UnorderedList);
                self.open_block(kind);
            }
            "ul" | "ol" => {
                self.close_implicit();
                let kind = if name == "ul" {
                    BlockKind::UnorderedList
                } else {
                    BlockKind::OrderedList
                };
                self.containers.push(Container::List(kind));
            }
            "blockquote" => {
                self.containers.push(Container::Quote);
                let kind = self.context_kind();
                self.open_block(kind);
            }
            "br" => {
                if self.current.as_ref().is_some_and(|b| !b.is_empty()) {
                    self.break_pending = true;
                }
            }
            _ if VOID_ELEMENTS.contains(&name) => {
                tracing::debug!(tag = name, "decode: dropping void element");
            }
            _ if self_closing => {}
            "strong" | "b" => self.push_inline(name, Effect::Style(InlineFlag::Bold)),
            "em" | "i" => self.push_inline(name, Effect::Style(InlineFlag::Italic)),
            "u" => self.push_inline(name, Effect::Style(InlineFlag::Underline)),
            "a" => {
                let href = href.filter(|h| !h.is_empty());
                self.push_inline(name, Effect::Link(href));
            }
            "span" | "code" => self.push_inline(name, Effect::Transparent),
            _ => {
                tracing::debug!(tag = name, "decode: unsupported tag treated as plain text");
                self.push_inline(name, Effect::Transparent);
            }
        }
    }

    fn end(&mut self, name: &str) {
        match name {
            "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "li" | "pre" => {
                self.close_block()
            }
            "ul" | "ol" => {
                self.close_block();
                if let Some(i) = self
                    .containers
                    .iter()
                    .rposition(|c| matches!(c, Container::List(_)))
                {
                    self.containers.truncate(i);
                }
            }
            "blockquote" => {
                self.close_block();
                if let Some(i) = self.containers.iter().rposition(|c| *c == Container::Quote) {
                    self.containers.truncate(i);
                }
            }
            _ => match self.inline.iter().rposition(|f| f.name == name) {
                Some(i) => self.inline.truncate(i),
                None => tracing::debug!(tag = name, "decode: ignoring stray closing tag"),
            },
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.break_pending {
            if text.trim().is_empty() {
                return;
            }
            self.break_pending = false;
            if let Some(block) = self.current.take() {
                let kind = block.kind;
                self.blocks.push(block);
                self.current = Some(Block::new(kind));
            }
        }
        if self.current.is_none() {
            if text.trim().is_empty() {
                return;
            }
            let kind = self.context_kind();
            self.current = Some(Block::new(kind));
        }

        let (style, link) = self.inline_format();
        if let Some(block) = self.current.as_mut() {
            block.runs.push(TextRun {
                text: text.to_string(),
                style,
                link,
            });
        }
    }

    fn push_inline(&mut self, name: &str, effect: Effect) {
        self.inline.push(InlineFrame {
            name: SmolStr::new(name),
            effect,
        });
    }

    fn inline_format(&self) -> (InlineStyle, Option<SmolStr>) {
        let mut style = InlineStyle::PLAIN;
        let mut link = None;
        for frame in &self.inline {
            match &frame.effect {
                Effect::Style(flag) => style.set(*flag, true),
                Effect::Link(href) => link = href.clone(),
                Effect::Transparent => {}
            }
        }
        (style, link)
    }

    fn list_kind(&self) -> Option<BlockKind> {
        self.containers.iter().rev().find_map(|c| match c {
            Container::List(kind) => Some(*kind),
            Container::Quote => None,
        })
    }

    /// Block kind implied by the innermost open container.
    fn context_kind(&self) -> BlockKind {
        match self.containers.last() {
            Some(Container::List(kind)) => *kind,
            Some(Container::Quote) => BlockKind::Blockquote,
            None => BlockKind::Paragraph,
        }
    }

    fn open_block(&mut self, kind: BlockKind) {
        self.close_implicit();
        self.current = Some(Block::new(kind));
    }

    /// Close the current block because another block starts. An implicitly
    /// closed block that never received content is dropped.
    fn close_implicit(&mut self) {
        match self.current.as_ref() {
            Some(block) if block.is_empty() => {
                self.current = None;
                self.break_pending = false;
            }
            Some(_) => self.close_block(),
            None => {}
        }
    }

    /// Close the current block because its end tag was seen.
    fn close_block(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.normalize();
            self.blocks.push(block);
            self.inline.clear();
        }
        self.break_pending = false;
    }

    fn finish(mut self) -> StructuredDocument {
        self.close_block();
        StructuredDocument::from_blocks(self.blocks)
    }
}
