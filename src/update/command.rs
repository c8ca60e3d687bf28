//! Command handlers (menu items, shortcuts, console lines)

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::keymap::{Command, CommandId};
use crate::model::{AppModel, WindowId};
use crate::theme::{ThemeError, ThemeSelection};

/// Run a command against a window (or the focused one)
pub fn update_command(
    model: &mut AppModel,
    window: Option<WindowId>,
    command: Command,
) -> Option<Cmd> {
    match command {
        Command::NewWindow => {
            let id = model.open_window();
            model.set_status(format!("Opened {}", id));
            None
        }

        Command::CloseWindow => {
            let id = model.target(window)?;
            model.close_window(id);
            let cancel = Some(Cmd::CancelRender(id));
            if model.windows.is_empty() {
                model.should_quit = true;
                return Cmd::batch([cancel, Some(Cmd::Quit)]);
            }
            cancel
        }

        Command::Open(path) => {
            let id = open_target(model, window);
            model.set_status(format!("Loading {}...", path.display()));
            Some(Cmd::LoadFile { window: id, path })
        }

        Command::Save => {
            let id = model.target(window)?;
            let win = model.window(id)?;
            match win.path() {
                Some(path) => {
                    let path = path.to_path_buf();
                    let revision = win.source.revision();
                    let content = win.source.snapshot();
                    model.set_status("Saving...");
                    Some(Cmd::SaveFile {
                        window: id,
                        path,
                        revision,
                        content,
                    })
                }
                None => {
                    model.set_status("No file path - cannot save");
                    None
                }
            }
        }

        Command::SaveAs(path) => {
            let id = model.target(window)?;
            let win = model.window_mut(id)?;
            win.set_path(Some(path.clone()));
            let revision = win.source.revision();
            let content = win.source.snapshot();
            model.set_status("Saving...");
            Cmd::batch([
                Some(Cmd::SaveFile {
                    window: id,
                    path: path.clone(),
                    revision,
                    content,
                }),
                Some(Cmd::WatchFile { path }),
            ])
        }

        Command::ExportRawHtml(path) => {
            let content = model.window(model.target(window)?)?.raw_html();
            Some(export(model, path, content))
        }

        Command::ExportStyledHtml(path) => {
            let content = model.window(model.target(window)?)?.styled_html();
            Some(export(model, path, content))
        }

        Command::SelectTheme { target, selector } => {
            match model.theme.select(&model.catalog, target, &selector) {
                Ok(_) => {
                    after_theme_change(model);
                    model.set_status(format!("{} theme: {}", target, selector));
                    None
                }
                Err(e) => Some(theme_failure(model, e)),
            }
        }

        Command::SelectCombination(selector) => {
            let selection = ThemeSelection::uniform(selector.clone());
            match model.theme.apply_selection(&model.catalog, &selection) {
                Ok(_) => {
                    after_theme_change(model);
                    model.set_status(format!("Theme combination: {}", selector));
                    None
                }
                Err(e) => Some(theme_failure(model, e)),
            }
        }

        Command::TogglePane(pane) => {
            let id = model.target(window)?;
            let win = model.window_mut(id)?;
            win.toggle_pane(pane);
            let state = if win.toggle.is_visible(pane) {
                "shown"
            } else {
                "hidden"
            };
            model.set_status(format!("{} pane {}", pane, state));
            None
        }

        Command::InsertHandler(emoji) => {
            let id = model.target(window)?;
            let result = model.window_mut(id)?.insert_handler(&emoji);
            match result {
                Ok(job) => job.map(Cmd::Render),
                Err(e) => {
                    model.set_status(format!("Error: {}", e));
                    None
                }
            }
        }

        Command::Quit => {
            model.should_quit = true;
            Some(Cmd::Quit)
        }
    }
}

/// Run a shortcut; commands that need a path cannot run from a bare key
pub fn update_shortcut(
    model: &mut AppModel,
    window: Option<WindowId>,
    id: CommandId,
) -> Option<Cmd> {
    match id.with_path(None) {
        Some(command) => update_command(model, window, command),
        None => {
            model.set_status(format!("{} needs a path", id.display_name()));
            None
        }
    }
}

/// Window an opened file goes into: the target if it is still blank,
/// otherwise a new one
fn open_target(model: &mut AppModel, window: Option<WindowId>) -> WindowId {
    let blank = model.target(window).filter(|id| {
        model.window(*id).is_some_and(|w| {
            w.path().is_none() && !w.source.is_modified() && w.source.len_chars() == 0
        })
    });
    match blank {
        Some(id) => id,
        None => model.open_window(),
    }
}

fn export(model: &mut AppModel, path: PathBuf, content: String) -> Cmd {
    model.set_status(format!("Exporting {}...", path.display()));
    Cmd::WriteExport { path, content }
}

/// A theme asset that cannot be resolved stops the process
fn theme_failure(model: &mut AppModel, error: ThemeError) -> Cmd {
    tracing::error!("Theme resolution failed: {}", error);
    model.set_status(format!("Error: {}", error));
    model.should_quit = true;
    Cmd::Fatal(error.to_string())
}

fn after_theme_change(model: &mut AppModel) {
    model.apply_theme_to_all();
    model.config.theme = model.theme.selection();
}
