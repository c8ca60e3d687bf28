//! Theme selectors: `family.variant` names for the three style targets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ThemeError;

/// Variant implied by a bare family name (`light` == `light.default`)
pub const DEFAULT_VARIANT: &str = "default";

/// The three independently themed surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeTarget {
    /// HTML preview stylesheet
    Viewer,
    /// Source editor token colors
    Editor,
    /// Application palette
    App,
}

impl ThemeTarget {
    pub const ALL: [ThemeTarget; 3] = [ThemeTarget::Viewer, ThemeTarget::Editor, ThemeTarget::App];

    /// Asset sub-folder holding this target's families
    pub fn folder(&self) -> &'static str {
        match self {
            ThemeTarget::Viewer => "viewer",
            ThemeTarget::Editor => "editor",
            ThemeTarget::App => "app",
        }
    }

    /// File extension of this target's variant files
    pub fn extension(&self) -> &'static str {
        match self {
            ThemeTarget::Viewer => "css",
            ThemeTarget::Editor | ThemeTarget::App => "yaml",
        }
    }
}

impl fmt::Display for ThemeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

impl FromStr for ThemeTarget {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(ThemeTarget::Viewer),
            "editor" => Ok(ThemeTarget::Editor),
            "app" => Ok(ThemeTarget::App),
            other => Err(ThemeError::InvalidSelector(format!(
                "unknown theme target '{}'",
                other
            ))),
        }
    }
}

/// A `family.variant` theme name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThemeSelector {
    pub family: String,
    pub variant: String,
}

impl ThemeSelector {
    pub fn new(family: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            variant: variant.into(),
        }
    }

    /// Parse `family.variant`, or a bare `family` meaning its default variant
    pub fn parse(s: &str) -> Result<Self, ThemeError> {
        let s = s.trim();
        let (family, variant) = match s.split_once('.') {
            Some((family, variant)) => (family, variant),
            None => (s, DEFAULT_VARIANT),
        };

        let valid = |part: &str| {
            !part.is_empty()
                && !part.contains(['/', '\\'])
                && part != ".."
                && !part.starts_with('.')
        };
        if !valid(family) || !valid(variant) {
            return Err(ThemeError::InvalidSelector(s.to_string()));
        }

        Ok(Self::new(family, variant))
    }

    /// Label for menus: bare family when the variant is the default one
    pub fn label(&self) -> String {
        if self.variant == DEFAULT_VARIANT {
            self.family.clone()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for ThemeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family, self.variant)
    }
}

impl FromStr for ThemeSelector {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ThemeSelector {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ThemeSelector> for String {
    fn from(selector: ThemeSelector) -> Self {
        selector.to_string()
    }
}

/// One selector per target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSelection {
    #[serde(default = "default_viewer")]
    pub viewer: ThemeSelector,
    #[serde(default = "default_catppuccin")]
    pub editor: ThemeSelector,
    #[serde(default = "default_catppuccin")]
    pub app: ThemeSelector,
}

fn default_viewer() -> ThemeSelector {
    ThemeSelector::new("light", DEFAULT_VARIANT)
}

fn default_catppuccin() -> ThemeSelector {
    ThemeSelector::new("catppuccin", "frappe")
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            viewer: default_viewer(),
            editor: default_catppuccin(),
            app: default_catppuccin(),
        }
    }
}

impl ThemeSelection {
    /// The same selector for all three targets
    pub fn uniform(selector: ThemeSelector) -> Self {
        Self {
            viewer: selector.clone(),
            editor: selector.clone(),
            app: selector,
        }
    }

    pub fn get(&self, target: ThemeTarget) -> &ThemeSelector {
        match target {
            ThemeTarget::Viewer => &self.viewer,
            ThemeTarget::Editor => &self.editor,
            ThemeTarget::App => &self.app,
        }
    }

    pub fn set(&mut self, target: ThemeTarget, selector: ThemeSelector) {
        match target {
            ThemeTarget::Viewer => self.viewer = selector,
            ThemeTarget::Editor => self.editor = selector,
            ThemeTarget::App => self.app = selector,
        }
    }
}
