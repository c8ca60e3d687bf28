//! Markdown Converter
//!
//! Source text in, HTML body out. Failures are reported as [`ConvertError`];
//! turning them into a displayable page is the render pipeline's job.

mod converter;
pub mod markmoji;

pub use converter::{ConvertError, Converter, MarkmojiConverter};
pub use markmoji::{handler_snippet, handlers, Handler, HandlerKind};
