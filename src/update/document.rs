//! Document message handlers (source edits)

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::model::{AppModel, WindowId};

/// Apply an edit; a change notice becomes a render job
pub fn update_document(
    model: &mut AppModel,
    window: Option<WindowId>,
    msg: DocumentMsg,
) -> Option<Cmd> {
    let id = model.target(window)?;
    let win = model.window_mut(id)?;

    let result = match msg {
        DocumentMsg::InsertText { at, text } => win.insert(at, &text),
        DocumentMsg::DeleteRange(range) => win.delete(range),
        DocumentMsg::ReplaceAll(text) => Ok(win.set_text(&text)),
        DocumentMsg::Type(text) => {
            let at = win.cursor.min(win.source.len_chars());
            win.insert(at, &text)
        }
        DocumentMsg::SetCursor(idx) => {
            win.cursor = idx.min(win.source.len_chars());
            return None;
        }
    };

    match result {
        Ok(job) => job.map(Cmd::Render),
        Err(e) => {
            model.set_status(format!("Error: {}", e));
            None
        }
    }
}
