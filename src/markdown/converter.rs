//! Markdown to HTML conversion using pulldown-cmark

use pulldown_cmark::{html, Options, Parser, TextMergeStream};
use thiserror::Error;

use super::markmoji;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{handler} handler needs a link target")]
    MissingTarget { handler: &'static str },
    #[error("'{value}' is not a valid colour")]
    InvalidColour { value: String },
    #[error("converter fault: {0}")]
    Internal(String),
}

/// Turns Markdown source into an HTML body fragment
pub trait Converter: Send + Sync {
    fn convert(&self, source: &str) -> Result<String, ConvertError>;
}

/// CommonMark plus the usual extensions plus Markmoji handlers
#[derive(Debug, Clone, Copy)]
pub struct MarkmojiConverter {
    options: Options,
}

impl Default for MarkmojiConverter {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_HEADING_ATTRIBUTES,
        }
    }
}

impl MarkmojiConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Options {
        self.options
    }
}

impl Converter for MarkmojiConverter {
    fn convert(&self, source: &str) -> Result<String, ConvertError> {
        let parser = Parser::new_ext(source, self.options);
        let events = markmoji::expand(TextMergeStream::new(parser))?;

        let mut html_output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());
        Ok(html_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(md: &str) -> String {
        MarkmojiConverter::new().convert(md).unwrap()
    }

    #[test]
    fn test_heading() {
        let html = convert("# Hello");
        assert!(html.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = convert("| A | B |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_plain_link_untouched() {
        let html = convert("[Click here](https://example.com)");
        assert!(html.contains(r#"<a href="https://example.com">Click here</a>"#));
    }

    #[test]
    fn test_image_handler() {
        let html = convert("Look: \u{1F5BC}\u{FE0F}[A cat](cat.png \"Sleeping\")");
        assert!(html.contains("Look: "));
        assert!(html.contains(r#"<img src="cat.png" alt="A cat" title="Sleeping">"#));
        assert!(!html.contains("<a href"));
        assert!(!html.contains('\u{1F5BC}'));
    }

    #[test]
    fn test_colour_handler() {
        let html = convert("\u{1F3A8}[warning](#e78284)");
        assert!(html.contains(r#"<span class="markmoji-colour" style="color: #e78284">warning</span>"#));
    }

    #[test]
    fn test_invalid_colour_fails() {
        let err = MarkmojiConverter::new()
            .convert("\u{1F3A8}[warning](12)")
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidColour { .. }));
    }

    #[test]
    fn test_emoji_without_link_is_text() {
        let html = convert("I like \u{1F3A5} films");
        assert!(html.contains("I like \u{1F3A5} films"));
    }

    #[test]
    fn test_emoji_in_code_is_untouched() {
        let html = convert("`\u{1F3A8}[x](12)`");
        assert!(html.contains("<code>"));
    }
}
