//! [`StructuredDocument`] → markup.
//!
//! Output is canonical: one tag spelling per construct and a fixed inline
//! nesting order (link, bold, italic, underline), so equal documents always
//! encode to equal strings.

use super::escape::{escape_attr, escape_text};
use crate::document::{Block, BlockKind, StructuredDocument, TextRun};

/// Encode a document. The blank document encodes as the empty string.
pub fn encode(doc: &StructuredDocument) -> String {
    if doc.is_blank() {
        return String::new();
    }

    let mut out = String::new();
    let mut open_list: Option<BlockKind> = None;
    for block in doc.blocks() {
        let list = block.kind.is_list().then_some(block.kind);
        if open_list != list {
            if let Some(kind) = open_list {
                out.push_str(list_close_tag(kind));
            }
            if let Some(kind) = list {
                out.push_str(list_open_tag(kind));
            }
            open_list = list;
        }
        write_block(&mut out, block);
    }
    if let Some(kind) = open_list {
        out.push_str(list_close_tag(kind));
    }
    out
}

fn block_tag(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Paragraph => "p",
        BlockKind::Heading1 => "h1",
        BlockKind::Heading2 => "h2",
        BlockKind::Heading3 => "h3",
        BlockKind::UnorderedList | BlockKind::OrderedList => "li",
        BlockKind::Blockquote => "blockquote",
        BlockKind::CodeBlock => "pre",
    }
}

fn list_open_tag(kind: BlockKind) -> &'static str {
    if kind == BlockKind::OrderedList {
        "<ol>"
    } else {
        "<ul>"
    }
}

fn list_close_tag(kind: BlockKind) -> &'static str {
    if kind == BlockKind::OrderedList {
        "</ol>"
    } else {
        "</ul>"
    }
}

fn write_block(out: &mut String, block: &Block) {
    let tag = block_tag(block.kind);
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for run in &block.runs {
        write_run(out, run);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_run(out: &mut String, run: &TextRun) {
    if let Some(href) = &run.link {
        out.push_str("<a href=\"");
        escape_attr(out, href);
        out.push_str("\">");
    }
    if run.style.bold {
        out.push_str("<strong>");
    }
    if run.style.italic {
        out.push_str("<em>");
    }
    if run.style.underline {
        out.push_str("<u>");
    }
    escape_text(out, &run.text);
    if run.style.underline {
        out.push_str("</u>");
    }
    if run.style.italic {
        out.push_str("</em>");
    }
    if run.style.bold {
        out.push_str("</strong>");
    }
    if run.link.is_some() {
        out.push_str("</a>");
    }
}
