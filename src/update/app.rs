//! App message handlers (file I/O results, on-disk changes)

use std::path::Path;

use crate::commands::Cmd;
use crate::messages::AppMsg;
use crate::model::AppModel;

/// Handle app messages (file operations, watcher events)
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::FileLoaded {
            window,
            path,
            result,
        } => match result {
            Ok(content) => {
                let Some(win) = model.window_mut(window) else {
                    tracing::debug!("Dropping load of {} for closed {}", path.display(), window);
                    return None;
                };
                // Our own save coming back through the watcher
                if win.path() == Some(path.as_path())
                    && !win.source.is_modified()
                    && win.source.snapshot() == content
                {
                    tracing::debug!("{} unchanged on disk; keeping {}", path.display(), window);
                    return None;
                }
                let job = win.load(path.clone(), &content);
                model.set_status(format!("Loaded: {}", path.display()));
                Cmd::batch([job.map(Cmd::Render), Some(Cmd::WatchFile { path })])
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                model.set_status(format!("Error: {}", e));
                None
            }
        },

        AppMsg::SaveCompleted {
            window,
            path,
            revision,
            result,
        } => {
            match result {
                Ok(()) => {
                    if let Some(win) = model.window_mut(window) {
                        // Edits made while the write ran are still unsaved
                        if win.path() == Some(path.as_path()) && win.source.revision() == revision {
                            win.source.mark_saved();
                        }
                    }
                    model.set_status(format!("Saved: {}", path.display()));
                }
                Err(e) => {
                    tracing::warn!("Failed to save {}: {}", path.display(), e);
                    model.set_status(format!("Error: {}", e));
                }
            }
            None
        }

        AppMsg::ExportCompleted { path, result } => {
            match result {
                Ok(()) => model.set_status(format!("Exported: {}", path.display())),
                Err(e) => {
                    tracing::warn!("Failed to export {}: {}", path.display(), e);
                    model.set_status(format!("Error: {}", e));
                }
            }
            None
        }

        AppMsg::FileChanged { path } => {
            let mut reloads = Vec::new();
            for (id, win) in &model.windows {
                let Some(own) = win.path() else { continue };
                if !same_file(own, &path) {
                    continue;
                }
                if win.source.is_modified() {
                    tracing::info!("{} changed on disk; keeping unsaved edits in {}", path.display(), id);
                } else {
                    reloads.push(Some(Cmd::LoadFile {
                        window: *id,
                        path: own.to_path_buf(),
                    }));
                }
            }
            Cmd::batch(reloads)
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
