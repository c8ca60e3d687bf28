//! Enumerated commands shared by menus, shortcuts and the console

use std::path::PathBuf;

use thiserror::Error;

use crate::markdown::markmoji;
use crate::model::Pane;
use crate::theme::{ThemeSelector, ThemeTarget};

/// Everything a user can ask a window (or the app) to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewWindow,
    CloseWindow,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    ExportRawHtml(PathBuf),
    ExportStyledHtml(PathBuf),
    SelectTheme {
        target: ThemeTarget,
        selector: ThemeSelector,
    },
    /// Same selector for viewer, editor and app
    SelectCombination(ThemeSelector),
    TogglePane(Pane),
    /// Insert `emoji[]()` at the window's cursor
    InsertHandler(String),
    Quit,
}

/// Command kinds without their arguments, for shortcut tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    NewWindow,
    CloseWindow,
    Open,
    Save,
    SaveAs,
    ExportRawHtml,
    ExportStyledHtml,
    SelectTheme,
    SelectCombination,
    TogglePane,
    InsertHandler,
    Quit,
}

impl CommandId {
    /// Whether the command needs a file path before it can run
    pub fn needs_path(self) -> bool {
        matches!(
            self,
            CommandId::Open | CommandId::SaveAs | CommandId::ExportRawHtml | CommandId::ExportStyledHtml
        )
    }

    /// Complete a path-taking command, or build an argument-free one
    pub fn with_path(self, path: Option<PathBuf>) -> Option<Command> {
        match (self, path) {
            (CommandId::NewWindow, _) => Some(Command::NewWindow),
            (CommandId::CloseWindow, _) => Some(Command::CloseWindow),
            (CommandId::Save, _) => Some(Command::Save),
            (CommandId::Quit, _) => Some(Command::Quit),
            (CommandId::Open, Some(path)) => Some(Command::Open(path)),
            (CommandId::SaveAs, Some(path)) => Some(Command::SaveAs(path)),
            (CommandId::ExportRawHtml, Some(path)) => Some(Command::ExportRawHtml(path)),
            (CommandId::ExportStyledHtml, Some(path)) => Some(Command::ExportStyledHtml(path)),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CommandId::NewWindow => "New Window",
            CommandId::CloseWindow => "Close Window",
            CommandId::Open => "Open...",
            CommandId::Save => "Save",
            CommandId::SaveAs => "Save As...",
            CommandId::ExportRawHtml => "Export Raw HTML...",
            CommandId::ExportStyledHtml => "Export Styled HTML...",
            CommandId::SelectTheme => "Select Theme",
            CommandId::SelectCombination => "Select Combination",
            CommandId::TogglePane => "Toggle Pane",
            CommandId::InsertHandler => "Insert Handler",
            CommandId::Quit => "Quit",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },
    #[error("{0}")]
    InvalidArgument(String),
}

impl Command {
    pub fn id(&self) -> CommandId {
        match self {
            Command::NewWindow => CommandId::NewWindow,
            Command::CloseWindow => CommandId::CloseWindow,
            Command::Open(_) => CommandId::Open,
            Command::Save => CommandId::Save,
            Command::SaveAs(_) => CommandId::SaveAs,
            Command::ExportRawHtml(_) => CommandId::ExportRawHtml,
            Command::ExportStyledHtml(_) => CommandId::ExportStyledHtml,
            Command::SelectTheme { .. } => CommandId::SelectTheme,
            Command::SelectCombination(_) => CommandId::SelectCombination,
            Command::TogglePane(_) => CommandId::TogglePane,
            Command::InsertHandler(_) => CommandId::InsertHandler,
            Command::Quit => CommandId::Quit,
        }
    }

    /// Parse a console line such as `open notes.md` or
    /// `theme editor catppuccin.mocha`
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        if name.is_empty() {
            return Err(CommandParseError::Empty);
        }

        let missing = |argument: &'static str| CommandParseError::MissingArgument {
            command: name.to_string(),
            argument,
        };
        let path = || {
            if rest.is_empty() {
                Err(missing("a path"))
            } else {
                Ok(PathBuf::from(rest))
            }
        };
        let selector = |text: &str| {
            text.parse::<ThemeSelector>()
                .map_err(|e| CommandParseError::InvalidArgument(e.to_string()))
        };

        match name.to_lowercase().as_str() {
            "new" | "new-window" => Ok(Command::NewWindow),
            "close" | "close-window" => Ok(Command::CloseWindow),
            "open" => Ok(Command::Open(path()?)),
            "save" => Ok(Command::Save),
            "save-as" | "saveas" => Ok(Command::SaveAs(path()?)),
            "export-raw" | "export-raw-html" => Ok(Command::ExportRawHtml(path()?)),
            "export-styled" | "export-styled-html" => Ok(Command::ExportStyledHtml(path()?)),
            "theme" => {
                let mut parts = rest.split_whitespace();
                let target = parts
                    .next()
                    .ok_or_else(|| missing("a target (viewer, editor or app)"))?
                    .parse::<ThemeTarget>()
                    .map_err(|e| CommandParseError::InvalidArgument(e.to_string()))?;
                let selector = selector(parts.next().ok_or_else(|| missing("a theme name"))?)?;
                Ok(Command::SelectTheme { target, selector })
            }
            "combination" | "combo" => {
                if rest.is_empty() {
                    return Err(missing("a theme name"));
                }
                Ok(Command::SelectCombination(selector(rest)?))
            }
            "toggle" => {
                if rest.is_empty() {
                    return Err(missing("a pane (source, html or preview)"));
                }
                rest.parse::<Pane>()
                    .map(Command::TogglePane)
                    .map_err(CommandParseError::InvalidArgument)
            }
            "insert" => {
                if rest.is_empty() {
                    return Err(missing("a handler emoji or name"));
                }
                markmoji::lookup(rest)
                    .or_else(|| {
                        markmoji::handlers()
                            .iter()
                            .find(|h| h.name.eq_ignore_ascii_case(rest))
                    })
                    .map(|h| Command::InsertHandler(h.emoji.to_string()))
                    .ok_or_else(|| {
                        CommandParseError::InvalidArgument(format!("Unknown handler '{}'", rest))
                    })
            }
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!(Command::parse("new"), Ok(Command::NewWindow));
        assert_eq!(Command::parse("  SAVE "), Ok(Command::Save));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_paths_keep_spaces() {
        assert_eq!(
            Command::parse("open my notes/today.md"),
            Ok(Command::Open(PathBuf::from("my notes/today.md")))
        );
        assert_eq!(
            Command::parse("export-styled out.html"),
            Ok(Command::ExportStyledHtml(PathBuf::from("out.html")))
        );
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(
            Command::parse("theme editor catppuccin.mocha"),
            Ok(Command::SelectTheme {
                target: ThemeTarget::Editor,
                selector: ThemeSelector::new("catppuccin", "mocha"),
            })
        );
        assert_eq!(
            Command::parse("combo light"),
            Ok(Command::SelectCombination(ThemeSelector::new("light", "default")))
        );
        assert!(Command::parse("theme sidebar dark").is_err());
    }

    #[test]
    fn test_parse_insert_by_name_or_emoji() {
        assert_eq!(
            Command::parse("insert colour"),
            Ok(Command::InsertHandler("\u{1F3A8}".to_string()))
        );
        assert_eq!(
            Command::parse("insert \u{1F5BC}"),
            Ok(Command::InsertHandler("\u{1F5BC}\u{FE0F}".to_string()))
        );
        assert!(Command::parse("insert banana").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse(""), Err(CommandParseError::Empty));
        assert!(matches!(
            Command::parse("open"),
            Err(CommandParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(CommandParseError::Unknown(_))
        ));
    }

    #[test]
    fn test_with_path() {
        assert_eq!(CommandId::Open.with_path(None), None);
        assert_eq!(
            CommandId::SaveAs.with_path(Some(PathBuf::from("a.md"))),
            Some(Command::SaveAs(PathBuf::from("a.md")))
        );
        assert_eq!(CommandId::Save.with_path(None), Some(Command::Save));
        assert!(CommandId::Open.needs_path());
        assert!(!CommandId::Save.needs_path());
    }
}
