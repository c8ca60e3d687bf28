//! Application palette: UI color roles, optionally per interaction state

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;

use super::{Color, ThemeError, ThemeSelector};

/// UI color roles of the application palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    Window,
    WindowText,
    Base,
    AlternateBase,
    ToolTipBase,
    ToolTipText,
    PlaceholderText,
    Text,
    Button,
    ButtonText,
    BrightText,
    Light,
    Midlight,
    Mid,
    Dark,
    Shadow,
    Highlight,
    HighlightedText,
    Link,
    LinkVisited,
}

impl ColorRole {
    /// Kebab-case name used for CSS custom properties
    pub fn css_name(&self) -> &'static str {
        match self {
            ColorRole::Window => "window",
            ColorRole::WindowText => "window-text",
            ColorRole::Base => "base",
            ColorRole::AlternateBase => "alternate-base",
            ColorRole::ToolTipBase => "tool-tip-base",
            ColorRole::ToolTipText => "tool-tip-text",
            ColorRole::PlaceholderText => "placeholder-text",
            ColorRole::Text => "text",
            ColorRole::Button => "button",
            ColorRole::ButtonText => "button-text",
            ColorRole::BrightText => "bright-text",
            ColorRole::Light => "light",
            ColorRole::Midlight => "midlight",
            ColorRole::Mid => "mid",
            ColorRole::Dark => "dark",
            ColorRole::Shadow => "shadow",
            ColorRole::Highlight => "highlight",
            ColorRole::HighlightedText => "highlighted-text",
            ColorRole::Link => "link",
            ColorRole::LinkVisited => "link-visited",
        }
    }
}

/// Widget interaction state a palette entry can be specialised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Active,
    Inactive,
    Disabled,
}

impl InteractionState {
    fn css_name(&self) -> &'static str {
        match self {
            InteractionState::Active => "active",
            InteractionState::Inactive => "inactive",
            InteractionState::Disabled => "disabled",
        }
    }
}

/// Raw app palette as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct AppStyleData {
    pub name: String,
    pub colors: BTreeMap<ColorRole, String>,
    #[serde(default)]
    pub states: BTreeMap<InteractionState, BTreeMap<ColorRole, String>>,
}

/// Resolved application palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStyle {
    pub selector: ThemeSelector,
    pub name: String,
    pub colors: BTreeMap<ColorRole, Color>,
    pub states: BTreeMap<InteractionState, BTreeMap<ColorRole, Color>>,
}

impl AppStyle {
    /// Load an app palette from a YAML file
    pub fn load(selector: &ThemeSelector, path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(selector, &content).map_err(|message| ThemeError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml(selector: &ThemeSelector, yaml: &str) -> Result<Self, String> {
        let data: AppStyleData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;

        let parse_roles = |roles: &BTreeMap<ColorRole, String>| {
            roles
                .iter()
                .map(|(role, hex)| Ok((*role, Color::from_hex(hex)?)))
                .collect::<Result<BTreeMap<_, _>, String>>()
        };

        let colors = parse_roles(&data.colors)?;
        let states = data
            .states
            .iter()
            .map(|(state, roles)| Ok((*state, parse_roles(roles)?)))
            .collect::<Result<BTreeMap<_, _>, String>>()?;

        Ok(Self {
            selector: selector.clone(),
            name: data.name,
            colors,
            states,
        })
    }

    /// Color for a role in a state, falling back to the state-less entry
    pub fn color(&self, role: ColorRole, state: InteractionState) -> Option<Color> {
        self.states
            .get(&state)
            .and_then(|roles| roles.get(&role))
            .or_else(|| self.colors.get(&role))
            .copied()
    }

    /// Palette as CSS custom properties on `:root`
    pub fn to_css_variables(&self) -> String {
        let mut css = String::from(":root {\n");
        for (role, color) in &self.colors {
            let _ = writeln!(css, "    --{}: {};", role.css_name(), color);
        }
        for (state, roles) in &self.states {
            for (role, color) in roles {
                let _ = writeln!(
                    css,
                    "    --{}-{}: {};",
                    state.css_name(),
                    role.css_name(),
                    color
                );
            }
        }
        css.push('}');
        css
    }
}
