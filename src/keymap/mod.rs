//! Commands, keyboard shortcuts and menus
//!
//! ```text
//! Keystroke → Keymap::lookup() → CommandId ─┐
//! Menu item ────────────────────────────────┼→ Command → Msg::Command
//! Console line → Command::parse() ──────────┘
//! ```

mod command;
#[allow(clippy::module_inception)]
mod keymap;
mod menu;
mod types;

pub use command::{Command, CommandId, CommandParseError};
pub use keymap::{parse_key_string, Keymap, KeymapError, DEFAULT_BINDINGS};
pub use menu::{Menu, MenuAction, MenuEntry};
pub use types::{Keystroke, Modifiers};
