//! Viewer styles: the raw stylesheet applied to the HTML preview

use std::path::{Path, PathBuf};

use super::{ThemeError, ThemeSelector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStyle {
    pub selector: ThemeSelector,
    pub path: PathBuf,
    pub stylesheet: String,
}

impl ViewerStyle {
    pub fn load(selector: &ThemeSelector, path: &Path) -> Result<Self, ThemeError> {
        let stylesheet = std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            selector: selector.clone(),
            path: path.to_path_buf(),
            stylesheet,
        })
    }
}
