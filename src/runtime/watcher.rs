//! File system watching for live preview of files edited on disk
//!
//! Uses the `notify` crate with debouncing. Each watched file's parent
//! directory is watched (editors often replace files instead of writing in
//! place) and events for other files in it are ignored. Changes arrive on
//! the runtime channel as [`AppMsg::FileChanged`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify_debouncer_mini::{
    new_debouncer, DebounceEventResult, DebouncedEvent, DebouncedEventKind, Debouncer,
};

use crate::messages::{AppMsg, Msg};

/// Default quiet period before a burst of writes is reported
pub const WATCH_DEBOUNCE_MS: u64 = 200;

type WatchedFiles = Arc<Mutex<HashSet<PathBuf>>>;

pub struct FileWatcher {
    debouncer: Debouncer<notify::RecommendedWatcher>,
    files: WatchedFiles,
    dirs: HashSet<PathBuf>,
}

impl FileWatcher {
    /// Start a watcher that reports into the runtime channel
    pub fn new(debounce: Duration, tx: Sender<Msg>) -> Result<Self, notify::Error> {
        let files: WatchedFiles = Arc::new(Mutex::new(HashSet::new()));
        let watched = Arc::clone(&files);

        let debouncer = new_debouncer(debounce, move |result: DebounceEventResult| match result {
            Ok(events) => {
                let changed = {
                    let files = match watched.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    changed_files(&events, &files)
                };
                for path in changed {
                    tracing::debug!("File changed on disk: {}", path.display());
                    let _ = tx.send(Msg::App(AppMsg::FileChanged { path }));
                }
            }
            Err(e) => {
                tracing::warn!("File system watcher error: {:?}", e);
            }
        })?;

        Ok(Self {
            debouncer,
            files,
            dirs: HashSet::new(),
        })
    }

    /// Watch one file; watching it again is a no-op
    pub fn watch(&mut self, path: &Path) -> Result<(), notify::Error> {
        let path = normalize(path);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !self.dirs.contains(&dir) {
            self.debouncer
                .watcher()
                .watch(&dir, notify::RecursiveMode::NonRecursive)?;
            self.dirs.insert(dir);
        }

        let mut files = match self.files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if files.insert(path.clone()) {
            tracing::info!("Watching {}", path.display());
        }
        Ok(())
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        let path = normalize(path);
        match self.files.lock() {
            Ok(files) => files.contains(&path),
            Err(poisoned) => poisoned.into_inner().contains(&path),
        }
    }
}

/// Canonical form when the file exists, otherwise absolute
fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

/// Watched files touched by a batch of events, each reported once
fn changed_files(events: &[DebouncedEvent], watched: &HashSet<PathBuf>) -> Vec<PathBuf> {
    let mut changed: Vec<PathBuf> = Vec::new();
    for event in events {
        if event.kind == DebouncedEventKind::AnyContinuous {
            // Still being written; the final Any event follows
            continue;
        }
        let path = normalize(&event.path);
        if watched.contains(&path) && !changed.contains(&path) {
            changed.push(path);
        }
    }
    changed
}
