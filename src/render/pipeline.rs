//! Synchronous conversion with failure recovery

use std::error::Error;
use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::markdown::markmoji::escape_html;
use crate::markdown::{ConvertError, Converter};

/// Marker text present in every error document
pub const ERROR_MARKER: &str = "Could not parse Markdown.";

/// What a render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Converted body, or the error document when `failed`
    pub html: String,
    pub failed: bool,
    pub elapsed: Duration,
}

/// Fixed-format HTML page describing a conversion failure
pub fn error_document(err: &(dyn Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(chain, "\ncaused by: {}", cause);
        source = cause.source();
    }

    format!(
        "<h1>Error</h1>\n<p>{} Error from the converter:</p>\n<pre><code>{}</code></pre>\n",
        ERROR_MARKER,
        escape_html(&chain)
    )
}

/// Convert `source`, substituting the error document for any failure
///
/// Converter errors and panics both end up as a `failed` output; nothing
/// propagates to the caller.
pub fn render_html(converter: &dyn Converter, source: &str) -> RenderOutput {
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(source)))
        .unwrap_or_else(|payload| Err(ConvertError::Internal(panic_message(payload.as_ref()))));
    let elapsed = start.elapsed();

    match result {
        Ok(html) => RenderOutput {
            html,
            failed: false,
            elapsed,
        },
        Err(err) => {
            tracing::warn!("Markdown conversion failed: {}", err);
            RenderOutput {
                html: error_document(&err),
                failed: true,
                elapsed,
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "converter panicked".to_string()
    }
}
