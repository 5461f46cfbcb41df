//! Markup codec: the tag-based string form of a [`crate::StructuredDocument`].
//!
//! `decode` is lenient and never fails; `encode` is canonical. For any
//! normalised document `d`, `decode(&encode(&d)) == d`.

mod decode;
mod escape;
mod parser;
mod writer;

pub use decode::decode;
pub use escape::{escape_attr, escape_text, unescape};
pub use parser::{MarkupEvent, Parser};
pub use writer::encode;
