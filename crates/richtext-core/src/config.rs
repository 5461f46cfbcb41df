use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER: &str = "Write your idea description with rich formatting...";
pub const DEFAULT_LINK_PROMPT: &str = "Enter URL:";

/// Host-facing editor settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shown while the document is empty and the editor is unfocused.
    pub placeholder: String,
    /// Message for the link URL prompt.
    pub link_prompt: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            link_prompt: DEFAULT_LINK_PROMPT.to_string(),
        }
    }
}
