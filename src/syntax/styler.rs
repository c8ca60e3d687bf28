//! Paints editor-style attributes over a buffer as a display overlay

use std::ops::Range;

use super::highlights::TokenCategory;
use super::lexer::Lexer;
use crate::document::DocumentBuffer;
use crate::theme::{Color, EditorStyle, TokenAttributes};

/// Display attributes for a char range of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Char indices, not bytes
    pub chars: Range<usize>,
    pub category: TokenCategory,
    pub attributes: TokenAttributes,
}

/// Buffer-wide colours taken from the editor style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferChrome {
    pub background: Color,
    pub line_number_background: Color,
    pub line_number_foreground: Color,
}

impl From<&EditorStyle> for BufferChrome {
    fn from(style: &EditorStyle) -> Self {
        Self {
            background: style.background,
            line_number_background: style.line_number_background,
            line_number_foreground: style.line_number_foreground,
        }
    }
}

#[derive(Debug, Default)]
pub struct SyntaxStyler {
    lexer: Lexer,
}

impl SyntaxStyler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    /// Re-lex the buffer and replace its overlay
    ///
    /// Change notices stay blocked for the duration. Text, revision and the
    /// modified flag are never touched.
    pub fn restyle(&mut self, buffer: &mut DocumentBuffer, style: &EditorStyle) {
        let mut buffer = buffer.block_notices();
        let source = buffer.snapshot();
        let spans = self.styled_spans(&source, buffer.language(), style);
        tracing::trace!(
            "Restyled {} spans at revision {} with {}",
            spans.len(),
            buffer.revision(),
            style.selector
        );
        buffer.set_style(BufferChrome::from(style), spans);
    }

    /// Styled spans for `source` in char coordinates
    pub fn styled_spans(
        &mut self,
        source: &str,
        language: super::LanguageId,
        style: &EditorStyle,
    ) -> Vec<StyledSpan> {
        let mut spans = Vec::new();
        let mut char_pos = 0;
        for token in self.lexer.tokenize(source, language) {
            let len = token.text.chars().count();
            spans.push(StyledSpan {
                chars: char_pos..char_pos + len,
                category: token.category,
                attributes: style.style_for(token.category.name()),
            });
            char_pos += len;
        }
        spans
    }
}
