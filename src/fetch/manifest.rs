use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// One file of the published sound library.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    #[serde(default)]
    pub filename: Option<String>,
    /// Hex MD5 of the file contents.
    #[serde(default)]
    pub hash: Option<String>,
}

impl ManifestEntry {
    /// The entry's path relative to the library root, if it is a plain
    /// relative path that stays inside it.
    pub fn relative_path(&self) -> Option<PathBuf> {
        let name = self.filename.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let path = Path::new(name);
        if path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            Some(path.to_path_buf())
        } else {
            None
        }
    }
}

pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>> {
    serde_json::from_str(text).map_err(|e| Error::Manifest(e.to_string()))
}

pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Manifest(format!("cannot read {}: {e}", path.display())))?;
    parse_manifest(&text)
}
