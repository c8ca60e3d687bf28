//! Language identification and detection

use std::path::Path;

/// Languages the styler knows how to lex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Markdown,
    Html,
}

impl LanguageId {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" | "mdown" | "mkd" => LanguageId::Markdown,
            "html" | "htm" | "xhtml" => LanguageId::Html,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Parse a user-supplied language name (`markdown`, `md`, `html`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "markdown" | "md" => Some(LanguageId::Markdown),
            "html" | "htm" => Some(LanguageId::Html),
            "text" | "plain" | "plaintext" | "txt" => Some(LanguageId::PlainText),
            _ => None,
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Markdown => "Markdown",
            LanguageId::Html => "HTML",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}
