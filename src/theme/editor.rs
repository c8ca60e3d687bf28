//! Editor styles: background, line-number chrome and per-token attributes
//!
//! Token rules use a compact style string, one rule per token category:
//!
//! ```yaml
//! tokens:
//!   default: "#c6d0f5"
//!   text.title: bold
//!   markmoji: "bold #ca9ee6"
//! ```
//!
//! A category inherits from `default` and from each of its dotted parents
//! before its own rule is applied.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Color, ThemeError, ThemeSelector};

/// Catch-all rule every token category inherits from
pub const CATCH_ALL: &str = "default";

/// Display attributes applied to a token's character range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenAttributes {
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A partially specified rule from a style string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenRule {
    pub color: Option<Color>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

impl TokenRule {
    /// Parse "bold italic #rrggbb"-style strings
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut rule = TokenRule::default();
        for word in spec.split_whitespace() {
            match word {
                "bold" => rule.bold = Some(true),
                "nobold" => rule.bold = Some(false),
                "italic" => rule.italic = Some(true),
                "noitalic" => rule.italic = Some(false),
                "underline" => rule.underline = Some(true),
                "nounderline" => rule.underline = Some(false),
                w if w.starts_with('#') => rule.color = Some(Color::from_hex(w)?),
                other => return Err(format!("Unknown style word '{}' in '{}'", other, spec)),
            }
        }
        Ok(rule)
    }

    fn apply_to(&self, attrs: &mut TokenAttributes) {
        if let Some(color) = self.color {
            attrs.color = Some(color);
        }
        if let Some(bold) = self.bold {
            attrs.bold = bold;
        }
        if let Some(italic) = self.italic {
            attrs.italic = italic;
        }
        if let Some(underline) = self.underline {
            attrs.underline = underline;
        }
    }
}

/// Raw editor style as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct EditorStyleData {
    pub name: String,
    pub background: String,
    pub line_numbers: LineNumberData,
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineNumberData {
    pub background: String,
    pub foreground: String,
}

/// Resolved editor style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorStyle {
    pub selector: ThemeSelector,
    pub name: String,
    pub background: Color,
    pub line_number_background: Color,
    pub line_number_foreground: Color,
    pub tokens: BTreeMap<String, TokenRule>,
}

impl EditorStyle {
    /// Load an editor style from a YAML file
    pub fn load(selector: &ThemeSelector, path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(selector, &content).map_err(|message| ThemeError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse an editor style from YAML text
    pub fn from_yaml(selector: &ThemeSelector, yaml: &str) -> Result<Self, String> {
        let data: EditorStyleData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;

        let tokens = data
            .tokens
            .iter()
            .map(|(category, spec)| Ok((category.clone(), TokenRule::parse(spec)?)))
            .collect::<Result<BTreeMap<_, _>, String>>()?;

        Ok(Self {
            selector: selector.clone(),
            name: data.name,
            background: Color::from_hex(&data.background)?,
            line_number_background: Color::from_hex(&data.line_numbers.background)?,
            line_number_foreground: Color::from_hex(&data.line_numbers.foreground)?,
            tokens,
        })
    }

    /// Attributes for a token category, inherited down its dotted path
    ///
    /// `text.title` applies `default`, then `text`, then `text.title`.
    pub fn style_for(&self, category: &str) -> TokenAttributes {
        let mut attrs = TokenAttributes::default();
        if let Some(rule) = self.tokens.get(CATCH_ALL) {
            rule.apply_to(&mut attrs);
        }

        let mut end = 0;
        while end < category.len() {
            end = category[end..]
                .find('.')
                .map(|pos| end + pos)
                .unwrap_or(category.len());
            if let Some(rule) = self.tokens.get(&category[..end]) {
                rule.apply_to(&mut attrs);
            }
            end += 1;
        }

        attrs
    }

    /// Default text color
    pub fn foreground(&self) -> Option<Color> {
        self.style_for(CATCH_ALL).color
    }
}
