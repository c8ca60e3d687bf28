//! Syntax Styler
//!
//! Lexes buffer text with tree-sitter and maps token categories onto the
//! active editor style as a display-only overlay.
//!
//! ## Pipeline
//!
//! ```text
//! text → Lexer::tokenize → Token { category, text } → EditorStyle::style_for
//!      → StyledSpan overlay on the DocumentBuffer
//! ```

mod highlights;
mod languages;
mod lexer;
mod styler;

pub use highlights::{highlight_id_for_name, TokenCategory, HIGHLIGHT_NAMES};
pub use languages::LanguageId;
pub use lexer::{Lexer, Token, Tokens};
pub use styler::{BufferChrome, StyledSpan, SyntaxStyler};
