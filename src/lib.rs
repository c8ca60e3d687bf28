//! Markmoji - Markdown editor core with live HTML preview
//!
//! Each editor window pairs a Markdown source buffer with a read-only HTML
//! mirror and a preview surface, all styled by one shared theme. State
//! changes follow the Elm Architecture: [`Msg`] → [`update`] → [`Cmd`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod document;
pub mod keymap;
pub mod markdown;
pub mod messages;
pub mod model;
pub mod preview;
pub mod render;
pub mod runtime;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::MarkmojiConfig;
pub use messages::Msg;
pub use model::AppModel;
pub use theme::SharedTheme;
pub use update::update;
