//! Preview displays for the headless runtime

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::preview::PreviewDisplay;

/// Writes each preview document to an HTML file
///
/// A `<base href>` is inserted right after `<head>` so relative links and
/// images resolve against the source file, not the output location.
#[derive(Debug)]
pub struct HtmlFileDisplay {
    path: PathBuf,
    open_on_first_display: bool,
    displayed: usize,
}

impl HtmlFileDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open_on_first_display: false,
            displayed: 0,
        }
    }

    /// Open the file in the default browser after it is first written
    pub fn open_in_browser(mut self, open: bool) -> Self {
        self.open_on_first_display = open;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of documents written so far
    pub fn displayed(&self) -> usize {
        self.displayed
    }
}

/// Insert `<base href>` after the first `<head>`, or prepend it
pub fn with_base(document: &str, base: &str) -> String {
    let tag = format!(
        "<base href=\"{}\">",
        base.replace('&', "&amp;").replace('"', "&quot;")
    );
    match document.find("<head>") {
        Some(at) => {
            let split = at + "<head>".len();
            format!("{}\n{}{}", &document[..split], tag, &document[split..])
        }
        None => format!("{}\n{}", tag, document),
    }
}

impl PreviewDisplay for HtmlFileDisplay {
    fn display(&mut self, document: &str, base: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(&self.path, with_base(document, base))
            .with_context(|| format!("writing preview to {}", self.path.display()))?;
        self.displayed += 1;
        tracing::debug!("Preview written to {}", self.path.display());

        if self.open_on_first_display && self.displayed == 1 {
            if let Err(e) = open::that(&self.path) {
                tracing::warn!("Could not open {} in a browser: {}", self.path.display(), e);
            }
        }
        Ok(())
    }
}

/// Discards every document
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl PreviewDisplay for NullDisplay {
    fn display(&mut self, _document: &str, _base: &str) -> anyhow::Result<()> {
        Ok(())
    }
}
