//! Theme assets bundled into the binary
//!
//! On startup the bundled files are written into the asset root so that the
//! catalog can discover them from disk alongside user-provided families.
//! Existing files are never overwritten.

use std::path::Path;

use super::{ThemeCatalog, ThemeError, ThemeSelector, ThemeTarget};

/// A theme file compiled into the binary
pub struct BuiltinAsset {
    pub target: ThemeTarget,
    pub family: &'static str,
    pub variant: &'static str,
    pub content: &'static str,
}

impl BuiltinAsset {
    pub fn selector(&self) -> ThemeSelector {
        ThemeSelector::new(self.family, self.variant)
    }
}

/// Registry of all bundled theme files
pub const BUILTIN_ASSETS: &[BuiltinAsset] = &[
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "catppuccin",
        variant: "frappe",
        content: include_str!("../../assets/themes/viewer/catppuccin/frappe.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "catppuccin",
        variant: "latte",
        content: include_str!("../../assets/themes/viewer/catppuccin/latte.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "catppuccin",
        variant: "macchiato",
        content: include_str!("../../assets/themes/viewer/catppuccin/macchiato.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "catppuccin",
        variant: "mocha",
        content: include_str!("../../assets/themes/viewer/catppuccin/mocha.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "dark",
        variant: "default",
        content: include_str!("../../assets/themes/viewer/dark/default.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Viewer,
        family: "light",
        variant: "default",
        content: include_str!("../../assets/themes/viewer/light/default.css"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "black",
        variant: "default",
        content: include_str!("../../assets/themes/editor/black/default.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "catppuccin",
        variant: "frappe",
        content: include_str!("../../assets/themes/editor/catppuccin/frappe.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "catppuccin",
        variant: "latte",
        content: include_str!("../../assets/themes/editor/catppuccin/latte.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "catppuccin",
        variant: "macchiato",
        content: include_str!("../../assets/themes/editor/catppuccin/macchiato.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "catppuccin",
        variant: "mocha",
        content: include_str!("../../assets/themes/editor/catppuccin/mocha.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "dark",
        variant: "default",
        content: include_str!("../../assets/themes/editor/dark/default.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::Editor,
        family: "light",
        variant: "default",
        content: include_str!("../../assets/themes/editor/light/default.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "catppuccin",
        variant: "frappe",
        content: include_str!("../../assets/themes/app/catppuccin/frappe.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "catppuccin",
        variant: "latte",
        content: include_str!("../../assets/themes/app/catppuccin/latte.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "catppuccin",
        variant: "macchiato",
        content: include_str!("../../assets/themes/app/catppuccin/macchiato.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "catppuccin",
        variant: "mocha",
        content: include_str!("../../assets/themes/app/catppuccin/mocha.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "dark",
        variant: "default",
        content: include_str!("../../assets/themes/app/dark/default.yaml"),
    },
    BuiltinAsset {
        target: ThemeTarget::App,
        family: "light",
        variant: "default",
        content: include_str!("../../assets/themes/app/light/default.yaml"),
    },
];

/// Write bundled assets missing from `root`; returns how many were written
pub fn install_builtin_assets(root: &Path) -> Result<usize, ThemeError> {
    let catalog = ThemeCatalog::new(root);
    let mut written = 0;

    for asset in BUILTIN_ASSETS {
        let path = catalog.asset_path(asset.target, &asset.selector());
        if path.exists() {
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ThemeError::Install {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, asset.content).map_err(|source| ThemeError::Install {
            path: path.clone(),
            source,
        })?;
        written += 1;
    }

    if written > 0 {
        tracing::info!(
            "Installed {} bundled theme files into {}",
            written,
            root.display()
        );
    }
    Ok(written)
}
