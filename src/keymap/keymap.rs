//! Fixed accelerator table

use std::collections::HashMap;

use thiserror::Error;

use super::command::CommandId;
use super::types::{Keystroke, Modifiers};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Default accelerators as written in menus and docs
pub const DEFAULT_BINDINGS: &[(&str, CommandId)] = &[
    ("ctrl+n", CommandId::NewWindow),
    ("ctrl+o", CommandId::Open),
    ("ctrl+s", CommandId::Save),
    ("ctrl+shift+s", CommandId::SaveAs),
];

/// Keystroke to command lookup
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<Keystroke, CommandId>,
}

impl Keymap {
    /// An empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in accelerators
    pub fn with_defaults() -> Self {
        let mut keymap = Self::new();
        for (key, command) in DEFAULT_BINDINGS {
            match parse_key_string(key) {
                Ok(stroke) => keymap.bind(stroke, *command),
                Err(e) => tracing::error!("Bad default binding {}: {}", key, e),
            }
        }
        keymap
    }

    pub fn bind(&mut self, keystroke: Keystroke, command: CommandId) {
        self.bindings.insert(keystroke, command);
    }

    pub fn lookup(&self, keystroke: &Keystroke) -> Option<CommandId> {
        self.bindings.get(keystroke).copied()
    }

    /// Parse and look up a key string such as `Ctrl+Shift+S`
    pub fn lookup_str(&self, key_str: &str) -> Result<Option<CommandId>, KeymapError> {
        Ok(self.lookup(&parse_key_string(key_str)?))
    }

    /// Accelerator bound to a command, for menu labels
    pub fn shortcut_for(&self, command: CommandId) -> Option<Keystroke> {
        self.bindings
            .iter()
            .find(|(_, bound)| **bound == command)
            .map(|(stroke, _)| *stroke)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Parse a key string like "ctrl+shift+s" into a Keystroke (case-insensitive)
pub fn parse_key_string(key_str: &str) -> Result<Keystroke, KeymapError> {
    let mut mods = Modifiers::NONE;
    let mut key = None;

    for part in key_str.split('+') {
        let part = part.trim().to_lowercase();
        match part.as_str() {
            "cmd" | "ctrl" | "control" => mods.ctrl = true,
            "shift" => mods.shift = true,
            "alt" | "option" | "opt" => mods.alt = true,
            _ => {
                let mut chars = part.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return Err(KeymapError::InvalidKey(part));
                };
                if key.replace(c).is_some() {
                    return Err(KeymapError::InvalidKey(format!(
                        "Multiple keys in binding: {}",
                        key_str
                    )));
                }
            }
        }
    }

    let key =
        key.ok_or_else(|| KeymapError::InvalidKey(format!("No key found in binding: {}", key_str)))?;
    Ok(Keystroke::new(key, mods))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accelerators() {
        let keymap = Keymap::with_defaults();
        assert_eq!(keymap.len(), 4);
        assert_eq!(keymap.lookup_str("ctrl+n"), Ok(Some(CommandId::NewWindow)));
        assert_eq!(keymap.lookup_str("Ctrl+O"), Ok(Some(CommandId::Open)));
        assert_eq!(keymap.lookup_str("ctrl+s"), Ok(Some(CommandId::Save)));
        assert_eq!(keymap.lookup_str("CTRL+SHIFT+S"), Ok(Some(CommandId::SaveAs)));
        assert_eq!(keymap.lookup_str("ctrl+q"), Ok(None));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(
            parse_key_string("shift+ctrl+s"),
            Ok(Keystroke::new('s', Modifiers::CTRL_SHIFT))
        );
        assert_eq!(
            parse_key_string("Cmd+O"),
            Ok(Keystroke::new('o', Modifiers::CTRL))
        );
        assert!(parse_key_string("f5").is_err());
        assert!(parse_key_string("ctrl+a+b").is_err());
        assert!(parse_key_string("ctrl").is_err());
        assert!(parse_key_string("ctrl+banana").is_err());
    }

    #[test]
    fn test_shortcut_for() {
        let keymap = Keymap::with_defaults();
        let stroke = keymap.shortcut_for(CommandId::SaveAs).unwrap();
        assert_eq!(stroke.to_string(), "Ctrl+Shift+S");
        assert!(keymap.shortcut_for(CommandId::Quit).is_none());
    }
}
