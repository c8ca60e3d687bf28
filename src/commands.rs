//! Side-effect commands returned from update
//!
//! The runtime executes these; update itself never touches the filesystem
//! or the render worker.

use std::path::PathBuf;

use crate::model::WindowId;
use crate::render::RenderJob;

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Convert a source snapshot (debounced on the worker when one runs)
    Render(RenderJob),
    /// Forget queued renders for a window that went away
    CancelRender(WindowId),
    /// Load file asynchronously into a window
    LoadFile { window: WindowId, path: PathBuf },
    /// Save a window's source asynchronously
    ///
    /// `revision` is the source revision `content` was taken from.
    SaveFile {
        window: WindowId,
        path: PathBuf,
        revision: u64,
        content: String,
    },
    /// Write an HTML export asynchronously
    WriteExport { path: PathBuf, content: String },
    /// Start watching a file for on-disk changes
    WatchFile { path: PathBuf },
    /// Stop the event loop
    Quit,
    /// Stop the event loop with an error the process cannot recover from
    Fatal(String),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine optional commands, collapsing empty and single batches
    pub fn batch(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .flatten()
            .filter(|cmd| *cmd != Cmd::None)
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Render jobs contained in this command, in execution order
    pub fn render_jobs(&self) -> Vec<&RenderJob> {
        match self {
            Cmd::Render(job) => vec![job],
            Cmd::Batch(cmds) => cmds.iter().flat_map(Cmd::render_jobs).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_quit(&self) -> bool {
        match self {
            Cmd::Quit | Cmd::Fatal(_) => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::is_quit),
            _ => false,
        }
    }

    /// The error carried by a fatal command, if any
    pub fn fatal_error(&self) -> Option<&str> {
        match self {
            Cmd::Fatal(error) => Some(error.as_str()),
            Cmd::Batch(cmds) => cmds.iter().find_map(Cmd::fatal_error),
            _ => None,
        }
    }
}
