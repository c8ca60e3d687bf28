//! Token categories
//!
//! Capture names from the highlight queries are mapped onto a fixed table of
//! dotted category names. The editor style looks categories up by name, so
//! the table doubles as the vocabulary theme files can target.

/// Capture names known to the styler.
/// Index into this array is the category id.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute (HTML attribute names)
    "comment",               // @comment
    "constant",              // @constant (doctype)
    "label",                 // @label (code fence info strings)
    "markmoji",              // Markmoji handler emoji
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket (< > </ />)
    "punctuation.delimiter", // @punctuation.delimiter (code fences)
    "punctuation.special",   // @punctuation.special (heading markers, list bullets)
    "string",                // @string (attribute values)
    "string.escape",         // @string.escape (backslash escapes)
    "tag",                   // @tag
    "text",                  // @text (everything no capture covers)
    "text.literal",          // @text.literal (code blocks)
    "text.quote",            // @text.quote (block quotes)
    "text.reference",        // @text.reference (link labels)
    "text.title",            // @text.title (headings)
    "text.uri",              // @text.uri (link destinations)
];

/// A lexical token category, an index into [`HIGHLIGHT_NAMES`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenCategory(u16);

impl TokenCategory {
    /// Assigned to every byte no capture covers
    pub const TEXT: TokenCategory = TokenCategory(12);
    pub const MARKMOJI: TokenCategory = TokenCategory(4);

    /// Look up a capture name, falling back through its dotted parents
    pub fn from_name(name: &str) -> Option<Self> {
        highlight_id_for_name(name).map(TokenCategory)
    }

    pub fn name(&self) -> &'static str {
        HIGHLIGHT_NAMES
            .get(self.0 as usize)
            .copied()
            .unwrap_or("text")
    }

    pub fn id(&self) -> u16 {
        self.0
    }
}

impl Default for TokenCategory {
    fn default() -> Self {
        Self::TEXT
    }
}

impl std::fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Get the index for a capture name
pub fn highlight_id_for_name(name: &str) -> Option<u16> {
    // Try the exact name first, then progressively shorter parents
    // (e.g. "text.title.setext" -> "text.title" -> "text").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as u16);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_table() {
        assert_eq!(TokenCategory::TEXT.name(), "text");
        assert_eq!(TokenCategory::MARKMOJI.name(), "markmoji");
    }

    #[test]
    fn test_highlight_id_lookup() {
        assert!(highlight_id_for_name("tag").is_some());
        assert!(highlight_id_for_name("text.title").is_some());
        assert!(highlight_id_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_hierarchical_fallback() {
        assert_eq!(
            TokenCategory::from_name("text.title.setext"),
            TokenCategory::from_name("text.title")
        );
        assert_eq!(
            TokenCategory::from_name("punctuation.unknown"),
            TokenCategory::from_name("punctuation")
        );
        assert_eq!(TokenCategory::from_name("none"), None);
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let mut sorted = HIGHLIGHT_NAMES.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, HIGHLIGHT_NAMES);
    }
}
