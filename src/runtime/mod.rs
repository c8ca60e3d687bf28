//! Headless runtime: message channel, command execution and the event loop
//!
//! ```text
//! console / watcher / worker / I/O threads ──Msg──▶ channel
//!          channel ──▶ update(model, msg) ──Cmd──▶ process_cmd
//! ```

mod console;
mod display;
mod watcher;

pub use console::{Console, ConsoleInput};
pub use display::{with_base, HtmlFileDisplay, NullDisplay};
pub use watcher::{FileWatcher, WATCH_DEBOUNCE_MS};

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::commands::Cmd;
use crate::config::MarkmojiConfig;
use crate::messages::{AppMsg, Msg};
use crate::model::AppModel;
use crate::render::{render_html, RenderResult, RenderWorker};
use crate::theme::{install_builtin_assets, SharedTheme, ThemeCatalog, ThemeSelection};
use crate::update::update;

/// Which background services the runtime starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Convert on the render worker; otherwise renders run inline
    pub background_render: bool,
    /// Reload files changed on disk
    pub watch_files: bool,
    pub render_debounce: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            background_render: true,
            watch_files: false,
            render_debounce: Duration::from_millis(crate::render::RENDER_DEBOUNCE_MS),
        }
    }
}

/// Theme catalog rooted at the configured asset dir, with the bundled
/// themes installed into it
pub fn prepare_catalog(config: &MarkmojiConfig) -> anyhow::Result<ThemeCatalog> {
    let root = config
        .asset_root()
        .context("no theme asset directory available")?;
    install_builtin_assets(&root)?;
    Ok(ThemeCatalog::new(root))
}

/// Resolve the startup theme; a selection that cannot be resolved is fatal
pub fn load_theme(
    catalog: &ThemeCatalog,
    selection: &ThemeSelection,
) -> anyhow::Result<Arc<SharedTheme>> {
    let theme = SharedTheme::load(catalog, selection).with_context(|| {
        format!(
            "loading theme (viewer={}, editor={}, app={})",
            selection.viewer, selection.editor, selection.app
        )
    })?;
    Ok(Arc::new(theme))
}

pub struct Runtime {
    model: AppModel,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    worker: Option<RenderWorker>,
    watcher: Option<FileWatcher>,
    fatal: Option<String>,
}

impl Runtime {
    pub fn new(model: AppModel, options: RuntimeOptions) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();

        let worker = if options.background_render {
            let tx = msg_tx.clone();
            let worker = RenderWorker::spawn(
                Arc::clone(&model.converter),
                options.render_debounce,
                move |result| {
                    let _ = tx.send(Msg::Render(result));
                },
            )
            .context("starting render worker")?;
            Some(worker)
        } else {
            None
        };

        let watcher = if options.watch_files {
            let watcher = FileWatcher::new(
                Duration::from_millis(WATCH_DEBOUNCE_MS),
                msg_tx.clone(),
            )
            .context("starting file watcher")?;
            Some(watcher)
        } else {
            None
        };

        Ok(Self {
            model,
            msg_tx,
            msg_rx,
            worker,
            watcher,
            fatal: None,
        })
    }

    /// Channel other threads send messages on
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AppModel {
        &mut self.model
    }

    /// Run one message through update and execute what it returns
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Execute a side effect; results come back as messages
    pub fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Render(job) => {
                if let Some(worker) = &self.worker {
                    worker.submit(job);
                    return;
                }
                let output = render_html(self.model.converter.as_ref(), &job.source);
                self.dispatch(Msg::Render(RenderResult {
                    window: job.window,
                    revision: job.revision,
                    output,
                }));
            }
            Cmd::CancelRender(window) => {
                if let Some(worker) = &self.worker {
                    worker.cancel(window);
                }
            }
            Cmd::LoadFile { window, path } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = std::fs::read_to_string(&path).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::FileLoaded {
                        window,
                        path,
                        result,
                    }));
                });
            }
            Cmd::SaveFile {
                window,
                path,
                revision,
                content,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = std::fs::write(&path, content).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::SaveCompleted {
                        window,
                        path,
                        revision,
                        result,
                    }));
                });
            }
            Cmd::WriteExport { path, content } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = std::fs::write(&path, content).map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::ExportCompleted { path, result }));
                });
            }
            Cmd::WatchFile { path } => self.watch(path),
            Cmd::Quit => {
                self.model.should_quit = true;
            }
            Cmd::Fatal(error) => {
                tracing::error!("Stopping: {}", error);
                self.model.should_quit = true;
                if self.fatal.is_none() {
                    self.fatal = Some(error);
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    fn watch(&mut self, path: PathBuf) {
        let Some(watcher) = &mut self.watcher else {
            return;
        };
        if let Err(e) = watcher.watch(&path) {
            tracing::warn!("Cannot watch {}: {}", path.display(), e);
        }
    }

    /// Handle messages until none arrives within `idle`, or quit
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self, idle: Duration) -> usize {
        let mut handled = 0;
        while !self.model.should_quit {
            match self.msg_rx.recv_timeout(idle) {
                Ok(msg) => {
                    self.dispatch(msg);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Error that stopped the runtime, if a fatal command was processed
    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    /// Block on the channel until a quit command
    ///
    /// Returns the error of a fatal command.
    pub fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!("Runtime started with {} window(s)", self.model.windows.len());
        while !self.model.should_quit {
            let msg = self
                .msg_rx
                .recv()
                .context("message channel closed")?;
            self.dispatch(msg);
        }
        if let Some(error) = self.fatal.take() {
            anyhow::bail!(error);
        }
        tracing::info!("Runtime stopped");
        Ok(())
    }

    /// Consume the runtime, stopping the worker and watcher
    pub fn into_model(self) -> AppModel {
        self.model
    }
}
