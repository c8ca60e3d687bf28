//! Tests for file commands: open, save, save as, exports and on-disk changes

mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::{inline_runtime, test_model_with_window};
use markmoji::commands::Cmd;
use markmoji::keymap::{Command, CommandId};
use markmoji::messages::{AppMsg, DocumentMsg, Msg};
use markmoji::runtime::Runtime;
use markmoji::update::update;

const IDLE: Duration = Duration::from_millis(300);

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn open(runtime: &mut Runtime, path: &PathBuf) {
    runtime.dispatch(Msg::command(Command::Open(path.clone())));
    runtime.pump(IDLE);
}

// ============================================================================
// Open
// ============================================================================

#[test]
fn test_open_loads_into_blank_window() {
    let (_root, mut runtime, recordings, id) = inline_runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "notes.md", "# Notes\n");

    open(&mut runtime, &path);

    let model = runtime.model();
    assert_eq!(model.windows.len(), 1);
    let window = model.window(id).unwrap();
    assert_eq!(window.path(), Some(path.as_path()));
    assert_eq!(window.source.snapshot(), "# Notes\n");
    assert!(!window.source.is_modified());
    assert_eq!(window.title(), "notes.md - Markmoji");
    assert_eq!(window.raw_html(), "<h1>Notes</h1>\n");

    let base = recordings.last(id).unwrap().base;
    assert!(base.starts_with("file://"));
    assert!(base.ends_with('/'));
}

#[test]
fn test_open_with_edited_window_opens_new_window() {
    let (_root, mut runtime, _recordings, first) = inline_runtime();
    runtime.dispatch(Msg::document(DocumentMsg::Type("draft".to_string())));
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "other.md", "other");

    open(&mut runtime, &path);

    let model = runtime.model();
    assert_eq!(model.windows.len(), 2);
    assert_eq!(model.window(first).unwrap().source.snapshot(), "draft");
    let focused = model.focused_window().unwrap();
    assert_ne!(focused.id, first);
    assert_eq!(focused.source.snapshot(), "other");
}

#[test]
fn test_open_missing_file_sets_status() {
    let (_root, mut runtime, _recordings, id) = inline_runtime();
    let dir = tempfile::tempdir().unwrap();

    open(&mut runtime, &dir.path().join("absent.md"));

    let model = runtime.model();
    assert!(model.status.as_deref().unwrap().starts_with("Error:"));
    assert!(model.window(id).unwrap().path().is_none());
}

// ============================================================================
// Save / Save As
// ============================================================================

#[test]
fn test_save_without_path_reports_status() {
    let (_root, mut model, _recordings, _id) = test_model_with_window();

    let cmd = update(&mut model, Msg::command(Command::Save));

    assert!(cmd.is_none());
    assert_eq!(model.status.as_deref(), Some("No file path - cannot save"));
}

#[test]
fn test_save_writes_remembered_path() {
    let (_root, mut runtime, _recordings, id) = inline_runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "notes.md", "old");
    open(&mut runtime, &path);

    runtime.dispatch(Msg::document(DocumentMsg::ReplaceAll("new".to_string())));
    assert!(runtime.model().window(id).unwrap().title().contains('*'));

    runtime.dispatch(Msg::command(Command::Save));
    runtime.pump(IDLE);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    let window = runtime.model().window(id).unwrap();
    assert!(!window.source.is_modified());
    assert!(!window.title().contains('*'));
}

#[test]
fn test_save_as_remembers_path_first() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    update(
        &mut model,
        Msg::document(DocumentMsg::ReplaceAll("# Title".to_string())),
    );
    let target = PathBuf::from("/tmp/markmoji-save-as.md");
    let revision = model.window(id).unwrap().source.revision();

    let cmd = update(&mut model, Msg::command(Command::SaveAs(target.clone()))).unwrap();

    assert_eq!(model.window(id).unwrap().path(), Some(target.as_path()));
    let Cmd::Batch(cmds) = cmd else {
        panic!("expected a batch, got {:?}", cmd);
    };
    assert!(cmds.contains(&Cmd::SaveFile {
        window: id,
        path: target.clone(),
        revision,
        content: "# Title".to_string(),
    }));
    assert!(cmds.contains(&Cmd::WatchFile { path: target }));
}

#[test]
fn test_save_failure_keeps_modified() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    update(&mut model, Msg::document(DocumentMsg::ReplaceAll("x".to_string())));
    let path = PathBuf::from("/nonexistent/dir/x.md");
    update(&mut model, Msg::command(Command::SaveAs(path.clone())));
    let revision = model.window(id).unwrap().source.revision();

    update(
        &mut model,
        Msg::App(AppMsg::SaveCompleted {
            window: id,
            path,
            revision,
            result: Err("No such file or directory".to_string()),
        }),
    );

    assert!(model.window(id).unwrap().source.is_modified());
    assert!(model.status.as_deref().unwrap().starts_with("Error:"));
}

#[test]
fn test_edits_during_save_stay_unsaved() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.md");
    update(&mut model, Msg::document(DocumentMsg::Type("first".to_string())));

    let cmd = update(&mut model, Msg::command(Command::SaveAs(path.clone()))).unwrap();
    let Cmd::Batch(cmds) = cmd else {
        panic!("expected a batch, got {:?}", cmd);
    };
    let Some(Cmd::SaveFile {
        revision, content, ..
    }) = cmds.into_iter().find(|c| matches!(c, Cmd::SaveFile { .. }))
    else {
        panic!("expected a save");
    };
    std::fs::write(&path, &content).unwrap();

    update(&mut model, Msg::document(DocumentMsg::Type(" second".to_string())));
    update(
        &mut model,
        Msg::App(AppMsg::SaveCompleted {
            window: id,
            path: path.clone(),
            revision,
            result: Ok(()),
        }),
    );

    let window = model.window(id).unwrap();
    assert_eq!(window.source.snapshot(), "first second");
    assert!(window.source.is_modified());
    assert!(window.title().contains('*'));

    // The watcher reports the write that just finished
    let cmd = update(&mut model, Msg::App(AppMsg::FileChanged { path }));
    assert!(cmd.is_none());
    assert_eq!(model.window(id).unwrap().source.snapshot(), "first second");
}

#[test]
fn test_own_save_does_not_reload() {
    let (_root, mut runtime, recordings, id) = inline_runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "notes.md", "old");
    open(&mut runtime, &path);
    runtime.dispatch(Msg::document(DocumentMsg::ReplaceAll("# New".to_string())));
    runtime.dispatch(Msg::document(DocumentMsg::SetCursor(2)));
    runtime.dispatch(Msg::command(Command::Save));
    runtime.pump(IDLE);

    let revision = runtime.model().window(id).unwrap().source.revision();
    let shown = recordings.count(id);
    runtime.dispatch(Msg::App(AppMsg::FileChanged { path: path.clone() }));
    runtime.pump(IDLE);

    let window = runtime.model().window(id).unwrap();
    assert!(!window.source.is_modified());
    assert_eq!(window.source.revision(), revision);
    assert_eq!(window.cursor, 2);
    assert_eq!(recordings.count(id), shown);
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_export_raw_and_styled() {
    let (_root, mut runtime, _recordings, _id) = inline_runtime();
    runtime.dispatch(Msg::document(DocumentMsg::Type("# Export".to_string())));
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.html");
    let styled = dir.path().join("styled.html");

    runtime.dispatch(Msg::command(Command::ExportRawHtml(raw.clone())));
    runtime.dispatch(Msg::command(Command::ExportStyledHtml(styled.clone())));
    runtime.pump(IDLE);

    assert_eq!(std::fs::read_to_string(&raw).unwrap(), "<h1>Export</h1>\n");

    let styled = std::fs::read_to_string(&styled).unwrap();
    assert!(styled.starts_with("<!DOCTYPE html>"));
    assert!(styled.contains(":root {"));
    assert!(styled.contains("<h1>Export</h1>"));
    let theme = runtime.model().theme.current();
    assert!(styled.contains(theme.viewer.stylesheet.trim()));
}

// ============================================================================
// On-disk changes
// ============================================================================

#[test]
fn test_change_on_disk_reloads_clean_buffer() {
    let (_root, mut runtime, _recordings, id) = inline_runtime();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "live.md", "# One");
    open(&mut runtime, &path);

    std::fs::write(&path, "# Two").unwrap();
    runtime.dispatch(Msg::App(AppMsg::FileChanged { path: path.clone() }));
    runtime.pump(IDLE);

    let window = runtime.model().window(id).unwrap();
    assert_eq!(window.source.snapshot(), "# Two");
    assert_eq!(window.raw_html(), "<h1>Two</h1>\n");
}

#[test]
fn test_change_on_disk_keeps_unsaved_edits() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "live.md", "# One");
    update(
        &mut model,
        Msg::App(AppMsg::FileLoaded {
            window: id,
            path: path.clone(),
            result: Ok("# One".to_string()),
        }),
    );
    update(&mut model, Msg::document(DocumentMsg::Type("edit ".to_string())));

    let cmd = update(&mut model, Msg::App(AppMsg::FileChanged { path }));

    assert!(cmd.is_none());
    assert!(model.window(id).unwrap().source.is_modified());
}

// ============================================================================
// Windows and shortcuts
// ============================================================================

#[test]
fn test_closing_last_window_quits() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    let second = model.open_window();

    let cmd = update(&mut model, Msg::command(Command::CloseWindow));
    assert_eq!(cmd, Some(Cmd::CancelRender(second)));
    assert!(!model.should_quit);

    let cmd = update(&mut model, Msg::command(Command::CloseWindow)).unwrap();
    assert!(cmd.is_quit());
    assert!(model.should_quit);
    assert!(model.window(id).is_none());
}

#[test]
fn test_shortcut_without_path_sets_status() {
    let (_root, mut model, _recordings, _id) = test_model_with_window();
    let cmd = update(
        &mut model,
        Msg::Shortcut {
            window: None,
            id: CommandId::Open,
        },
    );
    assert!(cmd.is_none());
    assert_eq!(model.status.as_deref(), Some("Open... needs a path"));
}

#[test]
fn test_new_window_shortcut() {
    let (_root, mut model, _recordings, first) = test_model_with_window();
    update(
        &mut model,
        Msg::Shortcut {
            window: None,
            id: CommandId::NewWindow,
        },
    );
    assert_eq!(model.windows.len(), 2);
    assert_ne!(model.focused, Some(first));
}

#[test]
fn test_insert_handler_places_cursor_in_label() {
    let (_root, mut model, _recordings, id) = test_model_with_window();
    let cmd = update(
        &mut model,
        Msg::command(Command::InsertHandler("\u{1F3A8}".to_string())),
    );
    assert!(matches!(cmd, Some(Cmd::Render(_))));

    update(&mut model, Msg::document(DocumentMsg::Type("red".to_string())));
    let window = model.window(id).unwrap();
    assert_eq!(window.source.snapshot(), "\u{1F3A8}[red]()");
}
