//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Nothing here
//! blocks on I/O: file access and background rendering come back as [`Cmd`]s.

mod app;
mod command;
mod document;
mod render;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::AppModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use command::{update_command, update_shortcut};
pub use document::update_document;
pub use render::update_render;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

fn update_inner(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Command { window, command } => command::update_command(model, window, command),
        Msg::Shortcut { window, id } => command::update_shortcut(model, window, id),
        Msg::Document { window, msg } => document::update_document(model, window, msg),
        Msg::Render(result) => render::update_render(model, result),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Traced update wrapper (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(model: &mut AppModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);
    if let Some(cmd) = &result {
        debug!(target: "message", ?cmd, "returned");
    }
    result
}

/// Short display name for a message; render bodies and file contents are
/// left out
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::AppMsg;

    match msg {
        Msg::Command { command, .. } => format!("Command::{:?}", command),
        Msg::Shortcut { id, .. } => format!("Shortcut::{:?}", id),
        Msg::Document { msg, .. } => format!("Document::{:?}", msg),
        Msg::Render(result) => format!("Render({}, rev {})", result.window, result.revision),
        Msg::App(AppMsg::FileLoaded { path, .. }) => {
            format!("App::FileLoaded({})", path.display())
        }
        Msg::App(m) => format!("App::{:?}", m),
    }
}
