//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use markmoji::config::MarkmojiConfig;
use markmoji::markdown::MarkmojiConverter;
use markmoji::model::{AppModel, WindowId};
use markmoji::preview::PreviewDisplay;
use markmoji::runtime::{Runtime, RuntimeOptions};
use markmoji::theme::{install_builtin_assets, SharedTheme, ThemeCatalog, ThemeSelection};
use tempfile::TempDir;

/// One document handed to a display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shown {
    pub window: WindowId,
    pub document: String,
    pub base: String,
}

/// Every document displayed by any window of a test model
#[derive(Debug, Clone, Default)]
pub struct Recordings(Arc<Mutex<Vec<Shown>>>);

impl Recordings {
    pub fn all(&self) -> Vec<Shown> {
        self.0.lock().unwrap().clone()
    }

    pub fn for_window(&self, window: WindowId) -> Vec<Shown> {
        self.all().into_iter().filter(|s| s.window == window).collect()
    }

    pub fn count(&self, window: WindowId) -> usize {
        self.for_window(window).len()
    }

    pub fn last(&self, window: WindowId) -> Option<Shown> {
        self.for_window(window).pop()
    }

    pub fn display_for(&self, window: WindowId) -> RecordingDisplay {
        RecordingDisplay {
            window,
            shown: Arc::clone(&self.0),
        }
    }
}

pub struct RecordingDisplay {
    window: WindowId,
    shown: Arc<Mutex<Vec<Shown>>>,
}

impl PreviewDisplay for RecordingDisplay {
    fn display(&mut self, document: &str, base: &str) -> anyhow::Result<()> {
        self.shown.lock().unwrap().push(Shown {
            window: self.window,
            document: document.to_string(),
            base: base.to_string(),
        });
        Ok(())
    }
}

/// Temporary asset root with the bundled themes installed
pub fn asset_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    install_builtin_assets(dir.path()).unwrap();
    dir
}

pub fn catalog(root: &TempDir) -> ThemeCatalog {
    ThemeCatalog::new(root.path())
}

/// Model with no windows, default theme and recording displays
///
/// Keep the returned `TempDir` alive for as long as the model is used.
pub fn test_model() -> (TempDir, AppModel, Recordings) {
    let root = asset_root();
    let catalog = catalog(&root);
    let theme = Arc::new(SharedTheme::load(&catalog, &ThemeSelection::default()).unwrap());
    let recordings = Recordings::default();
    let displays = recordings.clone();

    let model = AppModel::new(
        catalog,
        theme,
        Arc::new(MarkmojiConverter::new()),
        MarkmojiConfig::default(),
        Box::new(move |id: WindowId| -> Box<dyn PreviewDisplay> {
            Box::new(displays.display_for(id))
        }),
    );
    (root, model, recordings)
}

/// Model with one open window
pub fn test_model_with_window() -> (TempDir, AppModel, Recordings, WindowId) {
    let (root, mut model, recordings) = test_model();
    let id = model.open_window();
    (root, model, recordings, id)
}

/// Runtime that renders inline, so every message settles before `dispatch`
/// returns (file I/O still needs a `pump`)
pub fn inline_runtime() -> (TempDir, Runtime, Recordings, WindowId) {
    let (root, model, recordings, id) = test_model_with_window();
    let options = RuntimeOptions {
        background_render: false,
        watch_files: false,
        ..Default::default()
    };
    let runtime = Runtime::new(model, options).unwrap();
    (root, runtime, recordings, id)
}
