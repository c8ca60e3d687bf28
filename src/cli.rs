//! Command-line argument parsing
//!
//! Supports:
//! - One-shot rendering of a Markdown file
//! - Headless live preview with a file watcher and stdin console
//! - Listing theme catalogs and Markmoji handlers
//! - Printing a file's styled token stream

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::theme::{ThemeSelection, ThemeSelector, ThemeTarget};

/// Markdown editor core with live HTML preview
#[derive(Parser, Debug)]
#[command(name = "markmoji", version, about = "Markdown editor core with live HTML preview")]
pub struct CliArgs {
    /// Theme asset directory (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Convert a Markdown file to HTML once
    Render {
        /// Markdown file to convert
        input: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Emit a complete document with the viewer stylesheet and app palette
        #[arg(long)]
        styled: bool,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// Keep an HTML preview of a Markdown file up to date
    Watch {
        /// Markdown file to edit and watch
        input: PathBuf,

        /// Preview file (default: `<input>.preview.html` next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Open the preview in the default browser
        #[arg(long)]
        open: bool,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// List installed themes
    Themes {
        /// Only this target (viewer, editor or app)
        #[arg(long, value_name = "TARGET")]
        target: Option<ThemeTarget>,

        /// Only names installed for all three targets
        #[arg(long)]
        combinations: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a file with the editor theme's syntax colours
    Highlight {
        input: PathBuf,

        /// Language name (markdown, html, text); defaults to the file extension
        #[arg(long, value_name = "NAME")]
        language: Option<String>,

        #[command(flatten)]
        theme: ThemeArgs,
    },

    /// List the Markmoji emoji handlers
    Handlers,
}

/// Per-run theme overrides
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeArgs {
    /// Same theme for viewer, editor and app
    #[arg(long, value_name = "THEME")]
    pub combination: Option<ThemeSelector>,

    /// Viewer stylesheet, e.g. `dark` or `github.light`
    #[arg(long, value_name = "THEME")]
    pub viewer: Option<ThemeSelector>,

    /// Editor style, e.g. `catppuccin.mocha`
    #[arg(long, value_name = "THEME")]
    pub editor: Option<ThemeSelector>,

    /// App palette
    #[arg(long, value_name = "THEME")]
    pub app: Option<ThemeSelector>,
}

impl ThemeArgs {
    /// The configured selection with these overrides applied; single
    /// targets win over `--combination`
    pub fn apply(&self, base: &ThemeSelection) -> ThemeSelection {
        let mut selection = match &self.combination {
            Some(selector) => ThemeSelection::uniform(selector.clone()),
            None => base.clone(),
        };
        let overrides = [
            (ThemeTarget::Viewer, &self.viewer),
            (ThemeTarget::Editor, &self.editor),
            (ThemeTarget::App, &self.app),
        ];
        for (target, selector) in overrides {
            if let Some(selector) = selector {
                selection.set(target, selector.clone());
            }
        }
        selection
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Default preview location for `watch`
pub fn default_preview_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "preview".to_string());
    input.with_file_name(format!("{}.preview.html", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_render_args() {
        let args = parse(&["markmoji", "render", "notes.md", "-o", "out.html", "--styled"]);
        match args.command {
            CliCommand::Render {
                input,
                output,
                styled,
                theme,
            } => {
                assert_eq!(input, PathBuf::from("notes.md"));
                assert_eq!(output, Some(PathBuf::from("out.html")));
                assert!(styled);
                assert!(theme.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_theme_overrides() {
        let args = parse(&[
            "markmoji",
            "render",
            "a.md",
            "--combination",
            "dark",
            "--editor",
            "catppuccin.mocha",
        ]);
        let CliCommand::Render { theme, .. } = args.command else {
            panic!("expected render");
        };
        let selection = theme.apply(&ThemeSelection::default());
        assert_eq!(selection.viewer, ThemeSelector::new("dark", "default"));
        assert_eq!(selection.app, ThemeSelector::new("dark", "default"));
        assert_eq!(selection.editor, ThemeSelector::new("catppuccin", "mocha"));
    }

    #[test]
    fn test_invalid_selector_rejected() {
        assert!(CliArgs::try_parse_from(["markmoji", "render", "a.md", "--viewer", ".x"]).is_err());
    }

    #[test]
    fn test_themes_target() {
        let args = parse(&["markmoji", "--assets", "/tmp/t", "themes", "--target", "editor"]);
        assert_eq!(args.assets, Some(PathBuf::from("/tmp/t")));
        assert!(matches!(
            args.command,
            CliCommand::Themes {
                target: Some(ThemeTarget::Editor),
                combinations: false,
                json: false,
            }
        ));
    }

    #[test]
    fn test_default_preview_path() {
        assert_eq!(
            default_preview_path(Path::new("docs/notes.md")),
            PathBuf::from("docs/notes.preview.html")
        );
    }
}
