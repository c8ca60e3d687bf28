//! Which panes of a window are shown

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Markdown source editor
    Source,
    /// Read-only HTML mirror
    Html,
    /// Rendered preview
    Preview,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Source, Pane::Html, Pane::Preview];

    pub fn name(&self) -> &'static str {
        match self {
            Pane::Source => "source",
            Pane::Html => "html",
            Pane::Preview => "preview",
        }
    }
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" | "markdown" | "md" => Ok(Pane::Source),
            "html" => Ok(Pane::Html),
            "preview" | "viewer" => Ok(Pane::Preview),
            other => Err(format!("Unknown pane '{}'", other)),
        }
    }
}

/// Visibility of the three panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToggle {
    source: bool,
    html: bool,
    preview: bool,
}

impl Default for ViewToggle {
    fn default() -> Self {
        Self::from_values((true, false, true))
    }
}

impl ViewToggle {
    pub fn from_values((source, html, preview): (bool, bool, bool)) -> Self {
        Self {
            source,
            html,
            preview,
        }
    }

    pub fn values(&self) -> (bool, bool, bool) {
        (self.source, self.html, self.preview)
    }

    pub fn is_visible(&self, pane: Pane) -> bool {
        match pane {
            Pane::Source => self.source,
            Pane::Html => self.html,
            Pane::Preview => self.preview,
        }
    }

    /// Returns true when the value changed
    pub fn set(&mut self, pane: Pane, visible: bool) -> bool {
        let slot = match pane {
            Pane::Source => &mut self.source,
            Pane::Html => &mut self.html,
            Pane::Preview => &mut self.preview,
        };
        let changed = *slot != visible;
        *slot = visible;
        changed
    }

    /// Flip a pane, returning its new visibility
    pub fn toggle(&mut self, pane: Pane) -> bool {
        let visible = !self.is_visible(pane);
        self.set(pane, visible);
        visible
    }

    pub fn visible_panes(&self) -> Vec<Pane> {
        Pane::ALL
            .into_iter()
            .filter(|pane| self.is_visible(*pane))
            .collect()
    }
}
