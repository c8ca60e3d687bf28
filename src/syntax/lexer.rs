//! Tree-sitter lexing into a gap-free token stream
//!
//! Captures are painted onto a per-byte category table, outermost first, so
//! an inner capture (a heading marker inside a block quote) wins over the
//! node that contains it. Bytes no capture touches stay [`TokenCategory::TEXT`].

use std::collections::HashMap;
use std::ops::Range;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use super::highlights::TokenCategory;
use super::languages::LanguageId;
use crate::markdown::markmoji;

const MARKDOWN_HIGHLIGHTS: &str = include_str!("../../queries/markdown/highlights.scm");
const HTML_HIGHLIGHTS: &str = include_str!("../../queries/html/highlights.scm");

/// One lexed run of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub category: TokenCategory,
    pub text: &'a str,
    /// Byte range in the source
    pub range: Range<usize>,
}

/// Lazily yields the tokens of one lexing pass
#[derive(Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    runs: std::vec::IntoIter<(Range<usize>, TokenCategory)>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (range, category) = self.runs.next()?;
        Some(Token {
            category,
            text: &self.source[range.clone()],
            range,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.runs.size_hint()
    }
}

struct Grammar {
    parser: Parser,
    query: Query,
}

/// Parsers and compiled queries per language (tree-sitter parsers are !Sync)
pub struct Lexer {
    grammars: HashMap<LanguageId, Grammar>,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("languages", &self.grammars.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Lexer {
    pub fn new() -> Self {
        let mut lexer = Self {
            grammars: HashMap::new(),
        };
        lexer.init_language(LanguageId::Markdown);
        lexer.init_language(LanguageId::Html);
        lexer
    }

    /// Initialize a language's parser and query
    fn init_language(&mut self, lang: LanguageId) {
        let (ts_lang, highlights_scm): (tree_sitter::Language, &str) = match lang {
            LanguageId::Markdown => (tree_sitter_md::LANGUAGE.into(), MARKDOWN_HIGHLIGHTS),
            LanguageId::Html => (tree_sitter_html::LANGUAGE.into(), HTML_HIGHLIGHTS),
            LanguageId::PlainText => return,
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&ts_lang) {
            tracing::error!("Failed to set language for {:?}: {}", lang, e);
            return;
        }

        match Query::new(&ts_lang, highlights_scm) {
            Ok(query) => {
                self.grammars.insert(lang, Grammar { parser, query });
            }
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
            }
        }
    }

    /// Whether `language` gets anything beyond a single text token
    pub fn supports(&self, language: LanguageId) -> bool {
        self.grammars.contains_key(&language)
    }

    /// Lex `source` into tokens that cover it end to end
    pub fn tokenize<'a>(&mut self, source: &'a str, language: LanguageId) -> Tokens<'a> {
        let categories = self.paint(source, language);

        let mut runs = Vec::new();
        let mut current: Option<(usize, TokenCategory)> = None;
        for (i, _) in source.char_indices() {
            let category = categories[i];
            match current {
                Some((_, c)) if c == category => {}
                Some((start, c)) => {
                    runs.push((start..i, c));
                    current = Some((i, category));
                }
                None => current = Some((i, category)),
            }
        }
        if let Some((start, c)) = current {
            runs.push((start..source.len(), c));
        }

        Tokens {
            source,
            runs: runs.into_iter(),
        }
    }

    /// Category for every byte of `source`
    fn paint(&mut self, source: &str, language: LanguageId) -> Vec<TokenCategory> {
        let mut categories = vec![TokenCategory::TEXT; source.len()];

        let Some(grammar) = self.grammars.get_mut(&language) else {
            return categories;
        };
        let Some(tree) = grammar.parser.parse(source, None) else {
            tracing::warn!("Parse failed for {:?}, leaving text unstyled", language);
            return categories;
        };

        let query = &grammar.query;
        let mut spans: Vec<(Range<usize>, TokenCategory)> = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(query, tree.root_node(), source.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];

            let Some(category) = TokenCategory::from_name(capture_name) else {
                continue;
            };
            let range = capture.node.byte_range();
            let end = range.end.min(source.len());
            if range.start < end {
                spans.push((range.start..end, category));
            }
        }

        if language == LanguageId::Markdown {
            spans.extend(markmoji_spans(source));
        }

        // Outer spans first so nested ones overwrite them
        spans.sort_by(|(a, _), (b, _)| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        for (range, category) in spans {
            categories[range].fill(category);
        }

        tracing::trace!("Painted {} bytes of {:?}", source.len(), language);
        categories
    }
}

/// Handler emoji directly followed by `[`
fn markmoji_spans(source: &str) -> Vec<(Range<usize>, TokenCategory)> {
    source
        .match_indices('[')
        .filter_map(|(bracket, _)| {
            markmoji::handler_ending_at(&source[..bracket])
                .map(|(_, start)| (start..bracket, TokenCategory::MARKMOJI))
        })
        .collect()
}
