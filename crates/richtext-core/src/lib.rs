//! richtext-core: a rich text editing engine without framework dependencies.
//!
//! This crate provides:
//! - `StructuredDocument` - owned block/run tree with position paths
//! - `markup` - lenient decoder and canonical encoder for the tag markup
//! - `execute_command` / `execute_edit` - tree transformations
//! - `DocumentSurface`, `SyncBridge`, `observe` - the live editing pieces
//! - `RichTextEditor` - everything wired together behind one API
//! - `Toolbar` - format state projected onto buttons

pub mod actions;
pub mod bridge;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod execute;
pub mod markup;
pub mod observer;
pub mod surface;
pub mod text_helpers;
pub mod toolbar;
pub mod types;

pub use actions::{EditEvent, FormatCommand};
pub use bridge::{ChangeNotification, ChangeSink, SyncBridge};
pub use config::EditorConfig;
pub use document::{Block, BlockKind, InlineFlag, InlineStyle, StructuredDocument, TextRun};
pub use editor::RichTextEditor;
pub use error::{PositionParseError, UnknownCommand};
pub use execute::{execute_command, execute_edit};
pub use markup::{decode, encode};
pub use observer::{ActiveBlock, FormatState, observe};
pub use smol_str::SmolStr;
pub use surface::{DocumentSurface, EditOutcome, PendingStyle};
pub use toolbar::{LinkPrompt, Toolbar, ToolbarItem};
pub use types::{Position, Selection};
