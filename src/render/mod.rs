//! Render Pipeline
//!
//! ```text
//! ChangeNotice → restyle source → snapshot → RenderJob
//!             → convert (worker or render_now) → apply_render
//!             → mirror.set_text + restyle HTML → preview.set_body
//! ```
//!
//! Conversion failures never leave this module as errors; they are turned
//! into an error document and rendered like any other body.

mod pipeline;
mod worker;

pub use pipeline::{error_document, render_html, RenderOutput, ERROR_MARKER};
pub use worker::{RenderResult, RenderWorker};

use crate::model::WindowId;

/// Default delay between the last edit and the start of a background render
pub const RENDER_DEBOUNCE_MS: u64 = 150;

/// A snapshot of a window's source waiting to be converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub window: WindowId,
    pub revision: u64,
    pub source: String,
}

/// Per-window render state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering { revision: u64 },
}
