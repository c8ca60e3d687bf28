//! Message types for the Elm-style architecture
//!
//! All state changes flow through these messages.

use std::ops::Range;
use std::path::PathBuf;

use crate::keymap::{Command, CommandId};
use crate::model::WindowId;
use crate::render::RenderResult;

/// Text edits on a window's source buffer (char indices)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMsg {
    /// Insert text at a char index
    InsertText { at: usize, text: String },
    /// Delete a char range
    DeleteRange(Range<usize>),
    /// Replace the whole source
    ReplaceAll(String),
    /// Insert a typed text at the cursor
    Type(String),
    /// Move the insertion cursor
    SetCursor(usize),
}

/// App messages (file I/O results, watcher events)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    /// File load completed (async result)
    FileLoaded {
        window: WindowId,
        path: PathBuf,
        result: Result<String, String>,
    },
    /// File save completed (async result) for the source at `revision`
    SaveCompleted {
        window: WindowId,
        path: PathBuf,
        revision: u64,
        result: Result<(), String>,
    },
    /// Export write completed (async result)
    ExportCompleted {
        path: PathBuf,
        result: Result<(), String>,
    },
    /// A watched file changed on disk
    FileChanged { path: PathBuf },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// A command from the menu, the console or a resolved shortcut
    Command {
        window: Option<WindowId>,
        command: Command,
    },
    /// A shortcut that has not been given its arguments
    Shortcut {
        window: Option<WindowId>,
        id: CommandId,
    },
    /// Source edits
    Document {
        window: Option<WindowId>,
        msg: DocumentMsg,
    },
    /// A background conversion finished
    Render(RenderResult),
    /// App messages (file I/O, watcher)
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    /// Run a command on the focused window
    pub fn command(command: Command) -> Self {
        Msg::Command {
            window: None,
            command,
        }
    }

    /// Run a command on a specific window
    pub fn command_for(window: WindowId, command: Command) -> Self {
        Msg::Command {
            window: Some(window),
            command,
        }
    }

    /// Edit the focused window's source
    pub fn document(msg: DocumentMsg) -> Self {
        Msg::Document { window: None, msg }
    }

    pub fn insert_text(at: usize, text: impl Into<String>) -> Self {
        Msg::document(DocumentMsg::InsertText {
            at,
            text: text.into(),
        })
    }
}
