//! One editor window: source buffer, HTML mirror, preview and pane toggle

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::document::{ChangeNotice, DocumentBuffer, DocumentError, FileBinding};
use crate::markdown::{handler_snippet, Converter};
use crate::preview::{PreviewDisplay, PreviewSurface};
use crate::render::{render_html, RenderJob, RenderOutput, RenderState};
use crate::syntax::{LanguageId, SyntaxStyler};
use crate::theme::{ResolvedTheme, SharedTheme};

use super::toggle::{Pane, ViewToggle};

/// Unique identifier for an editor window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

pub struct EditorWindow {
    pub id: WindowId,
    /// Markdown the user edits
    pub source: DocumentBuffer,
    /// Last rendered HTML, read-only
    pub mirror: DocumentBuffer,
    pub preview: PreviewSurface,
    pub toggle: ViewToggle,
    pub file: FileBinding,
    pub render_state: RenderState,
    /// Char index where inserted handler snippets go
    pub cursor: usize,
    theme: Arc<SharedTheme>,
    applied_generation: Option<u64>,
    styler: SyntaxStyler,
}

impl std::fmt::Debug for EditorWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorWindow")
            .field("id", &self.id)
            .field("file", &self.file)
            .field("revision", &self.source.revision())
            .field("render_state", &self.render_state)
            .field("toggle", &self.toggle)
            .finish()
    }
}

impl EditorWindow {
    /// An empty window styled with the current theme
    pub fn new(id: WindowId, theme: Arc<SharedTheme>, display: Box<dyn PreviewDisplay>) -> Self {
        let stylesheet = theme.current().viewer.stylesheet.clone();
        let mut window = Self {
            id,
            source: DocumentBuffer::new(LanguageId::Markdown),
            mirror: DocumentBuffer::read_only(LanguageId::Html),
            preview: PreviewSurface::new(display, stylesheet),
            toggle: ViewToggle::default(),
            file: FileBinding::default(),
            render_state: RenderState::Idle,
            cursor: 0,
            theme,
            applied_generation: None,
            styler: SyntaxStyler::new(),
        };
        window.apply_theme();
        window
    }

    pub fn theme(&self) -> Arc<ResolvedTheme> {
        self.theme.current()
    }

    /// Title shown for the window, with a marker for unsaved changes
    pub fn title(&self) -> String {
        let marker = if self.source.is_modified() { "*" } else { "" };
        format!("{}{} - Markmoji", self.file.display_name(), marker)
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.path.as_deref()
    }

    /// Remember where the source lives; relative preview links follow it
    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.preview.set_source_path(path.as_deref());
        self.file.path = path;
    }

    /// Restyle and snapshot after a source change (pipeline steps 1-2)
    pub fn on_text_changed(&mut self, notice: ChangeNotice) -> RenderJob {
        let theme = self.theme.current();
        self.styler.restyle(&mut self.source, &theme.editor);

        self.render_state = RenderState::Rendering {
            revision: notice.revision,
        };
        RenderJob {
            window: self.id,
            revision: notice.revision,
            source: self.source.snapshot(),
        }
    }

    fn after_edit(&mut self, notice: Option<ChangeNotice>) -> Option<RenderJob> {
        notice.map(|notice| self.on_text_changed(notice))
    }

    /// Replace the whole source (file load, external change)
    pub fn set_text(&mut self, text: &str) -> Option<RenderJob> {
        let notice = self.source.set_text(text);
        self.cursor = self.source.len_chars();
        self.after_edit(notice)
    }

    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<Option<RenderJob>, DocumentError> {
        let notice = self.source.insert(char_idx, text)?;
        if self.cursor >= char_idx {
            self.cursor += text.chars().count();
        }
        Ok(self.after_edit(notice))
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<Option<RenderJob>, DocumentError> {
        let notice = self.source.delete(range.clone())?;
        if self.cursor >= range.end {
            self.cursor -= range.len();
        } else if self.cursor > range.start {
            self.cursor = range.start;
        }
        Ok(self.after_edit(notice))
    }

    /// Insert `emoji[]()` at the cursor and leave the cursor inside `[]`
    pub fn insert_handler(&mut self, emoji: &str) -> Result<Option<RenderJob>, DocumentError> {
        let at = self.cursor.min(self.source.len_chars());
        let snippet = handler_snippet(emoji);
        let job = self.insert(at, &snippet)?;
        self.cursor = at + emoji.chars().count() + 1;
        Ok(job)
    }

    /// Load file contents as the new, unmodified source
    pub fn load(&mut self, path: PathBuf, text: &str) -> Option<RenderJob> {
        self.set_path(Some(path));
        let job = self.set_text(text);
        self.source.mark_saved();
        job
    }

    /// Convert on the calling thread and apply the result
    pub fn render_now(&mut self, converter: &dyn Converter) -> RenderOutput {
        let revision = self.source.revision();
        self.render_state = RenderState::Rendering { revision };
        let output = render_html(converter, &self.source.snapshot());
        self.apply_render(revision, &output.html);
        output
    }

    /// Write a converted body downstream (pipeline steps 5-6)
    ///
    /// Returns false when the body belongs to an outdated revision.
    pub fn apply_render(&mut self, revision: u64, html: &str) -> bool {
        if revision != self.source.revision() {
            tracing::debug!(
                "{}: discarding render of rev {} (source at rev {})",
                self.id,
                revision,
                self.source.revision()
            );
            return false;
        }

        let theme = self.theme.current();
        {
            let mut mirror = self.mirror.block_notices();
            mirror.set_text(html);
            mirror.mark_saved();
        }
        self.styler.restyle(&mut self.mirror, &theme.editor);

        if let Err(e) = self.preview.set_body(html) {
            tracing::warn!("{}: preview display failed: {:#}", self.id, e);
        }
        self.render_state = RenderState::Idle;
        true
    }

    /// Restyle everything against the shared theme's current snapshot
    pub fn apply_theme(&mut self) {
        let generation = self.theme.generation();
        let theme = self.theme.current();

        self.styler.restyle(&mut self.source, &theme.editor);
        self.styler.restyle(&mut self.mirror, &theme.editor);
        self.preview.set_stylesheet(theme.viewer.stylesheet.clone());
        if let Err(e) = self.preview.refresh() {
            tracing::warn!("{}: preview refresh failed: {:#}", self.id, e);
        }

        self.applied_generation = Some(generation);
        tracing::debug!("{}: applied theme generation {}", self.id, generation);
    }

    /// Whether the window still shows an older theme
    pub fn theme_is_stale(&self) -> bool {
        self.applied_generation != Some(self.theme.generation())
    }

    /// Show or hide a pane; a preview that becomes visible is refreshed
    pub fn set_pane_visible(&mut self, pane: Pane, visible: bool) {
        if !self.toggle.set(pane, visible) {
            return;
        }
        if pane == Pane::Preview {
            self.preview.set_visible(visible);
            if visible {
                if let Err(e) = self.preview.refresh() {
                    tracing::warn!("{}: preview refresh failed: {:#}", self.id, e);
                }
            }
        }
    }

    pub fn toggle_pane(&mut self, pane: Pane) {
        let visible = !self.toggle.is_visible(pane);
        self.set_pane_visible(pane, visible);
    }

    /// Mirror contents for "Export raw HTML"
    pub fn raw_html(&self) -> String {
        self.mirror.snapshot()
    }

    /// Complete document for "Export styled HTML"
    pub fn styled_html(&self) -> String {
        let theme = self.theme.current();
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            crate::markdown::markmoji::escape_html(&self.file.display_name()),
            theme.app.to_css_variables(),
            theme.viewer.stylesheet,
            self.mirror.snapshot()
        )
    }
}
