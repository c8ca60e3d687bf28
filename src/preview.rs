//! Preview Surface - wraps rendered bodies in a styled document and shows them
//!
//! The surface keeps the last body it was given, so a theme change or a
//! hidden-to-visible transition can redisplay without a new render.

use std::collections::VecDeque;
use std::path::Path;
use std::time::{Duration, Instant};

/// Base location used when the document has no file
pub const FALLBACK_BASE_URL: &str = "file:///";

/// Number of display durations kept by [`RenderHistory`]
pub const HISTORY_LIMIT: usize = 10;

/// Somewhere a synthesized document can be shown
pub trait PreviewDisplay: Send {
    /// Show `document`, resolving relative links against `base`
    fn display(&mut self, document: &str, base: &str) -> anyhow::Result<()>;
}

/// Rolling record of display durations (oldest evicted first)
#[derive(Debug, Clone, Default)]
pub struct RenderHistory {
    durations: VecDeque<Duration>,
}

impl RenderHistory {
    pub fn push(&mut self, duration: Duration) {
        if self.durations.len() == HISTORY_LIMIT {
            self.durations.pop_front();
        }
        self.durations.push_back(duration);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Duration> {
        self.durations.iter()
    }

    pub fn last(&self) -> Option<Duration> {
        self.durations.back().copied()
    }

    pub fn average(&self) -> Option<Duration> {
        if self.durations.is_empty() {
            return None;
        }
        let total: Duration = self.durations.iter().sum();
        Some(total / self.durations.len() as u32)
    }
}

/// Full preview document for a body and stylesheet
pub fn synthesize_document(stylesheet: &str, body: &str) -> String {
    format!(
        "<head>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>",
        stylesheet, body
    )
}

/// `file://` URL of a file's directory, with a trailing slash
pub fn base_url_for(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let Some(dir) = absolute.parent() else {
        return FALLBACK_BASE_URL.to_string();
    };

    let mut url = String::from("file://");
    let dir = dir.to_string_lossy().replace('\\', "/");
    if !dir.starts_with('/') {
        url.push('/');
    }
    for c in dir.chars() {
        match c {
            ' ' => url.push_str("%20"),
            '#' => url.push_str("%23"),
            '%' => url.push_str("%25"),
            '?' => url.push_str("%3F"),
            c => url.push(c),
        }
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

pub struct PreviewSurface {
    display: Box<dyn PreviewDisplay>,
    visible: bool,
    body: String,
    stylesheet: String,
    base_url: String,
    history: RenderHistory,
}

impl std::fmt::Debug for PreviewSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSurface")
            .field("visible", &self.visible)
            .field("body_len", &self.body.len())
            .field("base_url", &self.base_url)
            .field("history", &self.history)
            .finish()
    }
}

impl PreviewSurface {
    /// A visible surface with an empty body
    pub fn new(display: Box<dyn PreviewDisplay>, stylesheet: impl Into<String>) -> Self {
        Self {
            display,
            visible: true,
            body: String::new(),
            stylesheet: stylesheet.into(),
            base_url: FALLBACK_BASE_URL.to_string(),
            history: RenderHistory::default(),
        }
    }

    /// Store `html` and show it if the surface is visible
    ///
    /// Returns whether a display happened.
    pub fn set_body(&mut self, html: impl Into<String>) -> anyhow::Result<bool> {
        self.body = html.into();
        self.show()
    }

    /// Redisplay the stored body with the current stylesheet
    pub fn refresh(&mut self) -> anyhow::Result<bool> {
        self.show()
    }

    fn show(&mut self) -> anyhow::Result<bool> {
        if !self.visible {
            tracing::trace!("Preview hidden, skipping display");
            return Ok(false);
        }

        let start = Instant::now();
        let document = synthesize_document(&self.stylesheet, &self.body);
        self.display.display(&document, &self.base_url)?;
        let elapsed = start.elapsed();

        self.history.push(elapsed);
        tracing::debug!("Preview displayed in {:?}", elapsed);
        Ok(true)
    }

    pub fn set_stylesheet(&mut self, css: impl Into<String>) {
        self.stylesheet = css.into();
    }

    /// Resolve relative links against the file's directory (or the fallback)
    pub fn set_source_path(&mut self, path: Option<&Path>) {
        self.base_url = match path {
            Some(path) => base_url_for(path),
            None => FALLBACK_BASE_URL.to_string(),
        };
    }

    /// Only flips visibility; callers refresh when showing
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn history(&self) -> &RenderHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(String, String)>>>);

    impl PreviewDisplay for Recorder {
        fn display(&mut self, document: &str, base: &str) -> anyhow::Result<()> {
            self.0
                .lock()
                .unwrap()
                .push((document.to_string(), base.to_string()));
            Ok(())
        }
    }

    struct Broken;

    impl PreviewDisplay for Broken {
        fn display(&mut self, _: &str, _: &str) -> anyhow::Result<()> {
            anyhow::bail!("display went away")
        }
    }

    #[test]
    fn test_template() {
        assert_eq!(
            synthesize_document("p{}", "<p>x</p>"),
            "<head>\n<style>\np{}\n</style>\n</head>\n<body>\n<p>x</p>\n</body>"
        );
    }

    #[test]
    fn test_hidden_surface_stores_without_display() {
        let recorder = Recorder::default();
        let mut surface = PreviewSurface::new(Box::new(recorder.clone()), "css");
        surface.set_visible(false);

        assert!(!surface.set_body("<p>one</p>").unwrap());
        assert!(!surface.set_body("<p>two</p>").unwrap());
        assert!(recorder.0.lock().unwrap().is_empty());

        surface.set_visible(true);
        assert!(recorder.0.lock().unwrap().is_empty());
        assert!(surface.refresh().unwrap());

        let shown = recorder.0.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].0.contains("<p>two</p>"));
        assert!(!shown[0].0.contains("<p>one</p>"));
    }

    #[test]
    fn test_refresh_uses_new_stylesheet() {
        let recorder = Recorder::default();
        let mut surface = PreviewSurface::new(Box::new(recorder.clone()), "old");
        surface.set_body("<p>x</p>").unwrap();
        surface.set_stylesheet("new");
        surface.refresh().unwrap();

        let shown = recorder.0.lock().unwrap();
        assert!(shown[1].0.contains("\nnew\n"));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = RenderHistory::default();
        for ms in 1..=11 {
            history.push(Duration::from_millis(ms));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.iter().next(), Some(&Duration::from_millis(2)));
        assert_eq!(history.last(), Some(Duration::from_millis(11)));
        assert_eq!(history.average(), Some(Duration::from_micros(6500)));
    }

    #[test]
    fn test_base_url() {
        let recorder = Recorder::default();
        let mut surface = PreviewSurface::new(Box::new(recorder), "");
        assert_eq!(surface.base_url(), FALLBACK_BASE_URL);

        surface.set_source_path(Some(Path::new("/home/me/my notes/a.md")));
        assert_eq!(surface.base_url(), "file:///home/me/my%20notes/");

        surface.set_source_path(None);
        assert_eq!(surface.base_url(), FALLBACK_BASE_URL);
    }

    #[test]
    fn test_display_failure_is_reported_and_not_timed() {
        let mut surface = PreviewSurface::new(Box::new(Broken), "");
        assert!(surface.set_body("<p>x</p>").is_err());
        assert_eq!(surface.body(), "<p>x</p>");
        assert!(surface.history().is_empty());
    }
}
