//! Tests for syntax styling against the bundled editor themes

mod common;

use common::{asset_root, catalog};
use markmoji::document::{DocumentBuffer, DocumentError};
use markmoji::syntax::{LanguageId, SyntaxStyler, TokenCategory};
use markmoji::theme::{Color, EditorStyle, ThemeSelector};

fn frappe() -> EditorStyle {
    let root = asset_root();
    catalog(&root)
        .resolve_editor(&ThemeSelector::new("catppuccin", "frappe"))
        .unwrap()
}

fn chars(source: &str, range: std::ops::Range<usize>) -> String {
    source.chars().skip(range.start).take(range.len()).collect()
}

#[test]
fn test_heading_is_bold_title() {
    let style = frappe();
    let source = "# Title\n\nbody\n";
    let spans = SyntaxStyler::new().styled_spans(source, LanguageId::Markdown, &style);

    let title = spans
        .iter()
        .find(|s| s.category == TokenCategory::from_name("text.title").unwrap())
        .unwrap();
    assert_eq!(chars(source, title.chars.clone()).trim(), "Title");
    assert!(title.attributes.bold);
    assert_eq!(title.attributes.color, Some(Color::rgb(0xe7, 0x82, 0x84)));
}

#[test]
fn test_markmoji_emoji_gets_its_own_colour() {
    let style = frappe();
    let source = "Look: \u{1F5BC}\u{FE0F}[cat](cat.png)\n";
    let spans = SyntaxStyler::new().styled_spans(source, LanguageId::Markdown, &style);

    let emoji = spans
        .iter()
        .find(|s| s.category == TokenCategory::MARKMOJI)
        .unwrap();
    assert!(chars(source, emoji.chars.clone()).starts_with('\u{1F5BC}'));
    assert_eq!(emoji.attributes.color, Some(Color::rgb(0xca, 0x9e, 0xe6)));
    assert!(emoji.attributes.bold);
}

#[test]
fn test_plain_text_uses_default_colour() {
    let style = frappe();
    let spans = SyntaxStyler::new().styled_spans("just words", LanguageId::PlainText, &style);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].chars, 0..10);
    assert_eq!(spans[0].attributes.color, style.foreground());
}

#[test]
fn test_mirror_buffer_restyles_but_rejects_edits() {
    let style = frappe();
    let mut mirror = DocumentBuffer::read_only(LanguageId::Html);
    mirror.set_text("<p>hi</p>\n");

    SyntaxStyler::new().restyle(&mut mirror, &style);

    assert_eq!(mirror.snapshot(), "<p>hi</p>\n");
    assert_eq!(mirror.chrome().unwrap().background, style.background);
    let tag = mirror.span_at(1).unwrap();
    assert_eq!(tag.category, TokenCategory::from_name("tag").unwrap());
    assert_eq!(mirror.insert(0, "x"), Err(DocumentError::ReadOnly));
}
