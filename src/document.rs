//! Document buffer - rope-backed text with revisions and a display overlay
//!
//! Every content change bumps the revision and produces a [`ChangeNotice`]
//! unless notices are blocked. The overlay written by the styler is display
//! state only: replacing it never touches text, revision or modified flag.

use std::ops::{Deref, DerefMut, Range};
use std::path::{Path, PathBuf};

use ropey::Rope;
use thiserror::Error;

use crate::syntax::{BufferChrome, LanguageId, StyledSpan};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("buffer is read-only")]
    ReadOnly,
    #[error("range {start}..{end} is outside a buffer of {len} chars")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Emitted after a content change while notices are not blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice {
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct DocumentBuffer {
    rope: Rope,
    language: LanguageId,
    read_only: bool,
    /// Incremented on each content change, used for staleness checks
    revision: u64,
    modified: bool,
    blocked: usize,
    overlay: Vec<StyledSpan>,
    chrome: Option<BufferChrome>,
}

impl Default for DocumentBuffer {
    fn default() -> Self {
        Self::new(LanguageId::PlainText)
    }
}

impl DocumentBuffer {
    pub fn new(language: LanguageId) -> Self {
        Self {
            rope: Rope::new(),
            language,
            read_only: false,
            revision: 0,
            modified: false,
            blocked: 0,
            overlay: Vec::new(),
            chrome: None,
        }
    }

    /// Create a buffer with initial text (revision 0, unmodified)
    pub fn with_text(text: &str, language: LanguageId) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::new(language)
        }
    }

    /// A buffer only programmatic `set_text` can change
    pub fn read_only(language: LanguageId) -> Self {
        Self {
            read_only: true,
            ..Self::new(language)
        }
    }

    /// Load UTF-8 text from disk, detecting the language from the extension
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::with_text(&content, LanguageId::from_path(path)))
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Copy of the full text
    pub fn snapshot(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    pub fn set_language(&mut self, language: LanguageId) {
        self.language = language;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clear the modified flag after the text reached disk
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn notices_blocked(&self) -> bool {
        self.blocked > 0
    }

    /// Replace the whole text; allowed on read-only buffers
    pub fn set_text(&mut self, text: &str) -> Option<ChangeNotice> {
        self.rope = Rope::from_str(text);
        self.changed()
    }

    /// Insert at a char index (user edit)
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<Option<ChangeNotice>, DocumentError> {
        self.check_edit(char_idx..char_idx)?;
        self.rope.insert(char_idx, text);
        Ok(self.changed())
    }

    /// Remove a char range (user edit)
    pub fn delete(&mut self, range: Range<usize>) -> Result<Option<ChangeNotice>, DocumentError> {
        self.check_edit(range.clone())?;
        self.rope.remove(range);
        Ok(self.changed())
    }

    fn check_edit(&self, range: Range<usize>) -> Result<(), DocumentError> {
        if self.read_only {
            return Err(DocumentError::ReadOnly);
        }
        let len = self.rope.len_chars();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    fn changed(&mut self) -> Option<ChangeNotice> {
        self.revision += 1;
        self.modified = true;
        if self.notices_blocked() {
            tracing::trace!("Change notice for revision {} suppressed", self.revision);
            None
        } else {
            Some(ChangeNotice {
                revision: self.revision,
            })
        }
    }

    /// Suppress change notices until the returned guard drops
    pub fn block_notices(&mut self) -> NoticeBlocker<'_> {
        self.blocked += 1;
        NoticeBlocker { buffer: self }
    }

    pub fn overlay(&self) -> &[StyledSpan] {
        &self.overlay
    }

    pub fn chrome(&self) -> Option<&BufferChrome> {
        self.chrome.as_ref()
    }

    /// Replace the display overlay
    pub fn set_style(&mut self, chrome: BufferChrome, overlay: Vec<StyledSpan>) {
        self.chrome = Some(chrome);
        self.overlay = overlay;
    }

    /// Overlay span covering a char index, if any
    pub fn span_at(&self, char_idx: usize) -> Option<&StyledSpan> {
        let pos = self
            .overlay
            .partition_point(|span| span.chars.end <= char_idx);
        self.overlay
            .get(pos)
            .filter(|span| span.chars.contains(&char_idx))
    }
}

/// Keeps change notices blocked while alive
pub struct NoticeBlocker<'a> {
    buffer: &'a mut DocumentBuffer,
}

impl Deref for NoticeBlocker<'_> {
    type Target = DocumentBuffer;

    fn deref(&self) -> &Self::Target {
        self.buffer
    }
}

impl DerefMut for NoticeBlocker<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer
    }
}

impl Drop for NoticeBlocker<'_> {
    fn drop(&mut self) {
        self.buffer.blocked = self.buffer.blocked.saturating_sub(1);
    }
}

/// Where a buffer's text came from and goes to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBinding {
    pub path: Option<PathBuf>,
}

impl FileBinding {
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_bump_revision_and_notify() {
        let mut buffer = DocumentBuffer::new(LanguageId::Markdown);
        assert_eq!(buffer.revision(), 0);
        assert!(!buffer.is_modified());

        let notice = buffer.insert(0, "hello").unwrap();
        assert_eq!(notice, Some(ChangeNotice { revision: 1 }));
        assert!(buffer.is_modified());

        let notice = buffer.delete(0..1).unwrap();
        assert_eq!(notice, Some(ChangeNotice { revision: 2 }));
        assert_eq!(buffer.snapshot(), "ello");
    }

    #[test]
    fn test_read_only_rejects_user_edits() {
        let mut mirror = DocumentBuffer::read_only(LanguageId::Html);
        assert_eq!(mirror.insert(0, "x"), Err(DocumentError::ReadOnly));
        assert_eq!(mirror.revision(), 0);

        assert!(mirror.set_text("<p>ok</p>").is_some());
        assert_eq!(mirror.snapshot(), "<p>ok</p>");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buffer = DocumentBuffer::with_text("abc", LanguageId::PlainText);
        assert!(matches!(
            buffer.delete(1..9),
            Err(DocumentError::OutOfBounds { len: 3, .. })
        ));
        assert!(buffer.insert(4, "x").is_err());
        assert!(buffer.insert(3, "d").is_ok());
    }

    #[test]
    fn test_blocked_notices_resume_after_guard() {
        let mut buffer = DocumentBuffer::new(LanguageId::PlainText);
        {
            let mut guard = buffer.block_notices();
            assert!(guard.notices_blocked());
            assert_eq!(guard.set_text("quiet"), None);
        }
        assert!(!buffer.notices_blocked());
        assert_eq!(buffer.revision(), 1);
        assert_eq!(buffer.set_text("loud"), Some(ChangeNotice { revision: 2 }));
    }

    #[test]
    fn test_file_binding_name() {
        assert_eq!(FileBinding::default().display_name(), "Untitled");
        let binding = FileBinding {
            path: Some(PathBuf::from("/notes/todo.md")),
        };
        assert_eq!(binding.display_name(), "todo.md");
    }
}
