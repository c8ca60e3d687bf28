//! Theme asset discovery and resolution
//!
//! Assets live under one root with a folder per target:
//!
//! ```text
//! {root}/viewer/{family}/{variant}.css
//! {root}/editor/{family}/{variant}.yaml
//! {root}/app/{family}/{variant}.yaml
//! ```
//!
//! Nothing is cached: every resolve reads the file again.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{
    AppStyle, EditorStyle, ResolvedTheme, ThemeError, ThemeSelection, ThemeSelector, ThemeTarget,
    ViewerStyle,
};

/// Installed theme assets for all targets
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    root: PathBuf,
}

impl ThemeCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a selector refers to, whether or not it exists
    pub fn asset_path(&self, target: ThemeTarget, selector: &ThemeSelector) -> PathBuf {
        self.root
            .join(target.folder())
            .join(&selector.family)
            .join(format!("{}.{}", selector.variant, target.extension()))
    }

    fn existing_asset(
        &self,
        target: ThemeTarget,
        selector: &ThemeSelector,
    ) -> Result<PathBuf, ThemeError> {
        let path = self.asset_path(target, selector);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ThemeError::NotFound {
                target,
                selector: selector.clone(),
                path,
            })
        }
    }

    pub fn resolve_viewer(&self, selector: &ThemeSelector) -> Result<ViewerStyle, ThemeError> {
        let path = self.existing_asset(ThemeTarget::Viewer, selector)?;
        ViewerStyle::load(selector, &path)
    }

    pub fn resolve_editor(&self, selector: &ThemeSelector) -> Result<EditorStyle, ThemeError> {
        let path = self.existing_asset(ThemeTarget::Editor, selector)?;
        EditorStyle::load(selector, &path)
    }

    pub fn resolve_app(&self, selector: &ThemeSelector) -> Result<AppStyle, ThemeError> {
        let path = self.existing_asset(ThemeTarget::App, selector)?;
        AppStyle::load(selector, &path)
    }

    /// Resolve all three specs of a selection
    pub fn resolve(&self, selection: &ThemeSelection) -> Result<ResolvedTheme, ThemeError> {
        tracing::debug!(
            "Resolving theme viewer={} editor={} app={}",
            selection.viewer,
            selection.editor,
            selection.app
        );
        Ok(ResolvedTheme {
            selection: selection.clone(),
            viewer: self.resolve_viewer(&selection.viewer)?,
            editor: self.resolve_editor(&selection.editor)?,
            app: self.resolve_app(&selection.app)?,
        })
    }

    /// Families (sub-folders) and their variants (files) for a target
    ///
    /// A missing target folder is an empty catalog, not an error.
    pub fn discover(&self, target: ThemeTarget) -> BTreeMap<String, Vec<String>> {
        let mut families = BTreeMap::new();
        let target_dir = self.root.join(target.folder());

        let Ok(entries) = std::fs::read_dir(&target_dir) else {
            tracing::debug!("No theme folder at {}", target_dir.display());
            return families;
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let family_dir = entry.path();
            if !family_dir.is_dir() {
                continue;
            }
            let Some(family) = family_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if family.starts_with('.') {
                continue;
            }

            let mut variants: Vec<String> = std::fs::read_dir(&family_dir)
                .into_iter()
                .flatten()
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .filter(|p| p.extension().is_some_and(|ext| ext == target.extension()))
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
                .collect();

            if variants.is_empty() {
                continue;
            }
            variants.sort();
            families.insert(family.to_string(), variants);
        }

        families
    }

    /// Every installed selector for a target
    pub fn selectors(&self, target: ThemeTarget) -> BTreeSet<ThemeSelector> {
        self.discover(target)
            .into_iter()
            .flat_map(|(family, variants)| {
                variants
                    .into_iter()
                    .map(move |variant| ThemeSelector::new(family.clone(), variant))
            })
            .collect()
    }

    /// Selectors installed for all three targets
    pub fn combinations(&self) -> BTreeSet<ThemeSelector> {
        combination_sets(
            &self.selectors(ThemeTarget::Viewer),
            &self.selectors(ThemeTarget::Editor),
            &self.selectors(ThemeTarget::App),
        )
    }
}

/// Names present in all three catalogs
pub fn combination_sets<T: Ord + Clone>(
    viewer: &BTreeSet<T>,
    editor: &BTreeSet<T>,
    app: &BTreeSet<T>,
) -> BTreeSet<T> {
    viewer
        .iter()
        .filter(|name| editor.contains(*name) && app.contains(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_combination_sets_intersects_all_three() {
        let combos = combination_sets(&set(&["a", "b"]), &set(&["a", "c"]), &set(&["a", "b", "c"]));
        assert_eq!(combos, set(&["a"]));
    }

    #[test]
    fn test_combination_sets_empty_when_any_catalog_empty() {
        let combos = combination_sets(&set(&["a"]), &set(&[]), &set(&["a"]));
        assert!(combos.is_empty());
    }

    #[test]
    fn test_asset_path_layout() {
        let catalog = ThemeCatalog::new("/themes");
        let path = catalog.asset_path(
            ThemeTarget::Editor,
            &ThemeSelector::new("catppuccin", "frappe"),
        );
        assert_eq!(path, PathBuf::from("/themes/editor/catppuccin/frappe.yaml"));
    }

    #[test]
    fn test_discover_missing_root_is_empty() {
        let catalog = ThemeCatalog::new("/definitely/not/a/theme/root");
        assert!(catalog.discover(ThemeTarget::Viewer).is_empty());
        assert!(catalog.combinations().is_empty());
    }
}
