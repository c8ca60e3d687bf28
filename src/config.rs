//! Configuration persistence
//!
//! Stores user preferences in `~/.config/markmoji/config.yaml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::RENDER_DEBOUNCE_MS;
use crate::theme::{SharedTheme, SubscriptionId, ThemeSelection};

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkmojiConfig {
    /// Selected viewer, editor and app themes
    #[serde(default)]
    pub theme: ThemeSelection,

    /// Quiet period after the last edit before a background render starts
    #[serde(default = "default_render_debounce_ms")]
    pub render_debounce_ms: u64,

    /// Theme asset root; defaults to the config themes dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,
}

fn default_render_debounce_ms() -> u64 {
    RENDER_DEBOUNCE_MS
}

impl Default for MarkmojiConfig {
    fn default() -> Self {
        Self {
            theme: ThemeSelection::default(),
            render_debounce_ms: default_render_debounce_ms(),
            assets_dir: None,
        }
    }
}

impl MarkmojiConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from an explicit file; missing or invalid files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save to an explicit file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn render_debounce(&self) -> Duration {
        Duration::from_millis(self.render_debounce_ms)
    }

    /// Where theme assets are looked up
    pub fn asset_root(&self) -> Option<PathBuf> {
        self.assets_dir
            .clone()
            .or_else(crate::config_paths::themes_dir)
    }
}

/// Write every theme change back into the config file at `path`
///
/// Other settings in the file are preserved.
pub fn persist_theme_changes(theme: &SharedTheme, path: PathBuf) -> SubscriptionId {
    theme.subscribe(move |change| {
        let mut config = MarkmojiConfig::load_from(&path);
        if config.theme == change.theme.selection {
            return;
        }
        config.theme = change.theme.selection.clone();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Failed to persist theme selection: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeSelector;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = MarkmojiConfig::load_from(&dir.path().join("config.yaml"));
        assert_eq!(config, MarkmojiConfig::default());
        assert_eq!(config.render_debounce_ms, 150);
    }

    #[test]
    fn test_defaults_when_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme: [not, a, map").unwrap();
        assert_eq!(MarkmojiConfig::load_from(&path), MarkmojiConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme:\n  editor: catppuccin.mocha\n").unwrap();

        let config = MarkmojiConfig::load_from(&path);
        assert_eq!(config.theme.editor, ThemeSelector::new("catppuccin", "mocha"));
        assert_eq!(config.theme.viewer, ThemeSelection::default().viewer);
        assert_eq!(config.render_debounce_ms, 150);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = MarkmojiConfig {
            render_debounce_ms: 40,
            assets_dir: Some(PathBuf::from("/opt/markmoji")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(MarkmojiConfig::load_from(&path), config);
    }
}
