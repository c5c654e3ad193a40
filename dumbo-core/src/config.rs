use serde::{Deserialize, Serialize};

/// Options for the Markdown converter.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Syntax highlight fenced code blocks
    pub highlight: bool,
    /// Name of a syntect default theme
    pub syntax_theme: String,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            syntax_theme: "base16-ocean.dark".to_string(),
        }
    }
}
