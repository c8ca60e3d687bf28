//! Application model - the complete state of the editor
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod toggle;
pub mod window;

pub use toggle::{Pane, ViewToggle};
pub use window::{EditorWindow, WindowId};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::MarkmojiConfig;
use crate::markdown::Converter;
use crate::preview::PreviewDisplay;
use crate::theme::{SharedTheme, ThemeCatalog};

/// Builds the display a new window's preview writes to
pub type DisplayFactory = Box<dyn Fn(WindowId) -> Box<dyn PreviewDisplay> + Send>;

/// The complete application model
pub struct AppModel {
    pub windows: BTreeMap<WindowId, EditorWindow>,
    /// Window that commands without an explicit target act on
    pub focused: Option<WindowId>,
    pub catalog: ThemeCatalog,
    /// Active theme shared by every window
    pub theme: Arc<SharedTheme>,
    pub converter: Arc<dyn Converter>,
    pub config: MarkmojiConfig,
    /// Last user-facing status line
    pub status: Option<String>,
    pub should_quit: bool,
    next_window_id: u64,
    displays: DisplayFactory,
}

impl std::fmt::Debug for AppModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppModel")
            .field("windows", &self.windows)
            .field("focused", &self.focused)
            .field("theme", &self.theme)
            .field("status", &self.status)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}

impl AppModel {
    /// A model with no windows open yet
    pub fn new(
        catalog: ThemeCatalog,
        theme: Arc<SharedTheme>,
        converter: Arc<dyn Converter>,
        config: MarkmojiConfig,
        displays: DisplayFactory,
    ) -> Self {
        Self {
            windows: BTreeMap::new(),
            focused: None,
            catalog,
            theme,
            converter,
            config,
            status: None,
            should_quit: false,
            next_window_id: 1,
            displays,
        }
    }

    /// Open an empty window and focus it
    pub fn open_window(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;

        let display = (self.displays)(id);
        let window = EditorWindow::new(id, Arc::clone(&self.theme), display);
        self.windows.insert(id, window);
        self.focused = Some(id);

        tracing::info!("Opened {}", id);
        id
    }

    /// Close a window, moving focus to the last remaining one
    pub fn close_window(&mut self, id: WindowId) -> Option<EditorWindow> {
        let window = self.windows.remove(&id)?;
        if self.focused == Some(id) {
            self.focused = self.windows.keys().next_back().copied();
        }
        tracing::info!("Closed {}", id);
        Some(window)
    }

    /// The explicit target, or the focused window
    pub fn target(&self, window: Option<WindowId>) -> Option<WindowId> {
        window
            .or(self.focused)
            .filter(|id| self.windows.contains_key(id))
    }

    pub fn window(&self, id: WindowId) -> Option<&EditorWindow> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut EditorWindow> {
        self.windows.get_mut(&id)
    }

    pub fn focused_window(&self) -> Option<&EditorWindow> {
        self.focused.and_then(|id| self.windows.get(&id))
    }

    /// Re-apply the shared theme to every window, before returning
    pub fn apply_theme_to_all(&mut self) {
        for window in self.windows.values_mut() {
            window.apply_theme();
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.status = Some(message);
    }
}
