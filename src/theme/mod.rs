//! Theme system
//!
//! A theme is three independently selected style specs:
//! - viewer: stylesheet for the HTML preview
//! - editor: background, line-number chrome and token attributes
//! - app: palette of UI color roles
//!
//! Each is named by a `family.variant` selector and loaded from the asset
//! root (see [`ThemeCatalog`]). Missing assets are configuration errors.

mod app;
mod builtin;
mod catalog;
mod color;
mod editor;
mod selector;
mod shared;
mod viewer;

use std::path::PathBuf;

pub use app::{AppStyle, ColorRole, InteractionState};
pub use builtin::{install_builtin_assets, BuiltinAsset, BUILTIN_ASSETS};
pub use catalog::{combination_sets, ThemeCatalog};
pub use color::Color;
pub use editor::{EditorStyle, TokenAttributes, TokenRule, CATCH_ALL};
pub use selector::{ThemeSelection, ThemeSelector, ThemeTarget, DEFAULT_VARIANT};
pub use shared::{SharedTheme, SubscriptionId, ThemeChange};
pub use viewer::ViewerStyle;

/// Errors raised while resolving theme assets
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid theme selector '{0}'")]
    InvalidSelector(String),

    #[error("no {target} theme '{selector}' installed (expected {})", .path.display())]
    NotFound {
        target: ThemeTarget,
        selector: ThemeSelector,
        path: PathBuf,
    },

    #[error("failed to read theme file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse theme file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to install bundled theme into {}: {source}", .path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All three specs of the active selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub selection: ThemeSelection,
    pub viewer: ViewerStyle,
    pub editor: EditorStyle,
    pub app: AppStyle,
}
