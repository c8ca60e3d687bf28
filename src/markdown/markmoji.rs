//! Markmoji: emoji-prefixed links that expand into media HTML
//!
//! ```markdown
//! 🖼️[A cat](cat.png "Sleeping")
//! 🎨[warning](#e78284)
//! ```
//!
//! A registered emoji immediately followed by an inline link is replaced by
//! the handler's markup. Any other link renders as usual.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};

use super::ConvertError;

/// Emoji variation selector; optional when matching handler emoji
const VARIATION_SELECTOR: char = '\u{FE0F}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Image,
    Video,
    Audio,
    Embed,
    Attachment,
    Colour,
}

/// A registered Markmoji handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handler {
    pub emoji: &'static str,
    pub name: &'static str,
    pub kind: HandlerKind,
}

pub const HANDLERS: &[Handler] = &[
    Handler {
        emoji: "\u{1F5BC}\u{FE0F}",
        name: "Image",
        kind: HandlerKind::Image,
    },
    Handler {
        emoji: "\u{1F3A5}",
        name: "Video",
        kind: HandlerKind::Video,
    },
    Handler {
        emoji: "\u{1F50A}",
        name: "Audio",
        kind: HandlerKind::Audio,
    },
    Handler {
        emoji: "\u{1F310}",
        name: "Embed",
        kind: HandlerKind::Embed,
    },
    Handler {
        emoji: "\u{1F4CE}",
        name: "Attachment",
        kind: HandlerKind::Attachment,
    },
    Handler {
        emoji: "\u{1F3A8}",
        name: "Colour",
        kind: HandlerKind::Colour,
    },
];

/// All registered handlers, in menu order
pub fn handlers() -> &'static [Handler] {
    HANDLERS
}

/// Find a handler by its emoji (with or without the variation selector)
pub fn lookup(emoji: &str) -> Option<&'static Handler> {
    let bare = emoji.trim_end_matches(VARIATION_SELECTOR);
    HANDLERS
        .iter()
        .find(|h| h.emoji.trim_end_matches(VARIATION_SELECTOR) == bare)
}

/// Text inserted by the "Insert handler" action
pub fn handler_snippet(emoji: &str) -> String {
    format!("{}[]()", emoji)
}

/// Handler whose emoji ends `text`, with the emoji's starting byte
pub fn handler_ending_at(text: &str) -> Option<(&'static Handler, usize)> {
    HANDLERS.iter().find_map(|handler| {
        let bare = handler.emoji.trim_end_matches(VARIATION_SELECTOR);
        if text.ends_with(handler.emoji) {
            Some((handler, text.len() - handler.emoji.len()))
        } else if text.ends_with(bare) {
            Some((handler, text.len() - bare.len()))
        } else {
            None
        }
    })
}

impl Handler {
    /// Markup for `emoji[label](target "title")`
    pub fn render(&self, label: &str, target: &str, title: &str) -> Result<String, ConvertError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ConvertError::MissingTarget { handler: self.name });
        }

        let src = escape_html(target);
        let label = escape_html(label);
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };

        let html = match self.kind {
            HandlerKind::Image => format!(r#"<img src="{src}" alt="{label}"{title_attr}>"#),
            HandlerKind::Video => {
                format!(r#"<video src="{src}" controls{title_attr}>{label}</video>"#)
            }
            HandlerKind::Audio => {
                format!(r#"<audio src="{src}" controls{title_attr}>{label}</audio>"#)
            }
            HandlerKind::Embed => {
                format!(r#"<iframe src="{src}" title="{label}" allowfullscreen></iframe>"#)
            }
            HandlerKind::Attachment => {
                let text = if label.is_empty() {
                    escape_html(target.rsplit('/').next().unwrap_or(target))
                } else {
                    label
                };
                format!(r#"<a class="markmoji-attachment" href="{src}" download{title_attr}>{text}</a>"#)
            }
            HandlerKind::Colour => {
                if !is_valid_colour(target) {
                    return Err(ConvertError::InvalidColour {
                        value: target.to_string(),
                    });
                }
                format!(
                    r#"<span class="markmoji-colour" style="color: {src}"{title_attr}>{label}</span>"#
                )
            }
        };
        Ok(html)
    }
}

/// CSS hex colour (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) or a named colour
pub fn is_valid_colour(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

/// Replace `emoji` + inline link sequences with handler markup
///
/// Expects merged text events, so the emoji is always at the end of the text
/// event directly before the link.
pub fn expand<'a>(
    events: impl Iterator<Item = Event<'a>>,
) -> Result<Vec<Event<'a>>, ConvertError> {
    let mut out = Vec::new();
    let mut events = events.peekable();

    while let Some(event) = events.next() {
        if let Event::Text(text) = &event {
            if let Some((handler, start)) = handler_ending_at(text) {
                let is_link = matches!(
                    events.peek(),
                    Some(Event::Start(Tag::Link {
                        link_type: LinkType::Inline,
                        ..
                    }))
                );
                if is_link {
                    if let Some(Event::Start(Tag::Link {
                        dest_url, title, ..
                    })) = events.next()
                    {
                        let label = collect_label(&mut events);
                        let before = &text[..start];
                        if !before.is_empty() {
                            out.push(Event::Text(CowStr::from(before.to_string())));
                        }
                        let html = handler.render(&label, &dest_url, &title)?;
                        out.push(Event::InlineHtml(CowStr::from(html)));
                        continue;
                    }
                }
            }
        }
        out.push(event);
    }

    Ok(out)
}

/// Consume a link's events up to its end tag, keeping only the text
fn collect_label<'a>(events: &mut impl Iterator<Item = Event<'a>>) -> String {
    let mut label = String::new();
    for event in events.by_ref() {
        match event {
            Event::End(TagEnd::Link) => break,
            Event::Text(text) | Event::Code(text) => label.push_str(&text),
            Event::SoftBreak | Event::HardBreak => label.push(' '),
            _ => {}
        }
    }
    label
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_variation_selector() {
        assert_eq!(lookup("\u{1F5BC}").map(|h| h.kind), Some(HandlerKind::Image));
        assert_eq!(lookup("\u{1F5BC}\u{FE0F}").map(|h| h.kind), Some(HandlerKind::Image));
        assert!(lookup("x").is_none());
    }

    #[test]
    fn test_handler_ending_at() {
        let text = "See \u{1F3A8}";
        let (handler, start) = handler_ending_at(text).unwrap();
        assert_eq!(handler.kind, HandlerKind::Colour);
        assert_eq!(&text[..start], "See ");
        assert!(handler_ending_at("no emoji").is_none());
    }

    #[test]
    fn test_snippet() {
        assert_eq!(handler_snippet("\u{1F3A5}"), "\u{1F3A5}[]()");
    }

    #[test]
    fn test_colour_validation() {
        assert!(is_valid_colour("#fff"));
        assert!(is_valid_colour("#e78284"));
        assert!(is_valid_colour("rebeccapurple"));
        assert!(!is_valid_colour("#ggg"));
        assert!(!is_valid_colour("12"));
        assert!(!is_valid_colour("red;x"));
    }

    #[test]
    fn test_render_escapes_attributes() {
        let image = lookup("\u{1F5BC}").unwrap();
        let html = image.render("a \"cat\"", "cat.png", "").unwrap();
        assert_eq!(html, r#"<img src="cat.png" alt="a &quot;cat&quot;">"#);
    }

    #[test]
    fn test_empty_target_is_error() {
        let audio = lookup("\u{1F50A}").unwrap();
        assert!(matches!(
            audio.render("song", "  ", ""),
            Err(ConvertError::MissingTarget { handler: "Audio" })
        ));
    }

    #[test]
    fn test_attachment_defaults_label_to_file_name() {
        let clip = lookup("\u{1F4CE}").unwrap();
        let html = clip.render("", "docs/report.pdf", "").unwrap();
        assert!(html.contains(">report.pdf</a>"));
        assert!(html.contains(" download"));
    }
}
