//! Keystrokes for the accelerator table

use std::fmt;

/// Modifier keys held with an accelerator
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Ctrl, or Cmd on macOS
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::CTRL
    };

    pub const fn is_empty(self) -> bool {
        !(self.ctrl || self.shift || self.alt)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = [(self.ctrl, "Ctrl"), (self.shift, "Shift"), (self.alt, "Alt")];
        let names: Vec<&str> = held
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join("+"))
    }
}

/// A character key with modifiers; the key is stored lowercase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: char,
    pub mods: Modifiers,
}

impl Keystroke {
    pub fn new(key: char, mods: Modifiers) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            mods,
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key.to_ascii_uppercase();
        if self.mods.is_empty() {
            write!(f, "{}", key)
        } else {
            write!(f, "{}+{}", self.mods, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keystroke_display() {
        assert_eq!(Keystroke::new('s', Modifiers::CTRL_SHIFT).to_string(), "Ctrl+Shift+S");
        assert_eq!(Keystroke::new('n', Modifiers::CTRL).to_string(), "Ctrl+N");
        assert_eq!(Keystroke::new('x', Modifiers::NONE).to_string(), "X");
    }

    #[test]
    fn test_keystroke_is_case_insensitive() {
        assert_eq!(
            Keystroke::new('A', Modifiers::CTRL),
            Keystroke::new('a', Modifiers::CTRL)
        );
        assert!(Modifiers::NONE.is_empty());
        assert!(!Modifiers::CTRL_SHIFT.is_empty());
    }
}
