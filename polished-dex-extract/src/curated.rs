//! Hand-maintained item data.
//!
//! Some acquisition routes (event distributions, NPC trades, shops
//! driven by scripts) are not expressed in a form the extractors can read.
//! They live in a directory of YAML files, each holding a list of
//! [`CuratedItem`] entries that are overlaid on the extracted items.

use std::path::Path;

use polished_dex_core::{ItemLocation, Variant, reduce};
use serde::Deserialize;

use crate::error::ExtractError;

/// One overlay entry.
///
/// ```yaml
/// - id: gsball
///   name: GS Ball
///   description: A mysterious Poké Ball.
///   keyItem: true
///   locations:
///     - area: goldenrodpokecenter1f
///       method: gift
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub key_item: bool,
    #[serde(default)]
    pub locations: Vec<ItemLocation>,
    /// Restrict the entry to one variant; both when absent.
    #[serde(default)]
    pub variant: Option<Variant>,
}

impl CuratedItem {
    /// Normalized identity of the entry.
    pub fn key(&self) -> String {
        reduce(&self.id)
    }

    pub fn applies_to(&self, variant: Variant) -> bool {
        self.variant.is_none_or(|v| v == variant)
    }
}

/// Load every `.yaml`/`.yml` file in `dir`, in file-name order. A missing
/// directory yields no entries.
pub fn load_curated_items(dir: &Path) -> Result<Vec<CuratedItem>, ExtractError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(ExtractError::NotADirectory(dir.display().to_string()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| ExtractError::ReadFile {
            path: dir.to_path_buf(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut all = Vec::new();
    for entry in entries {
        let path = entry.path();
        let contents = std::fs::read_to_string(&path).map_err(|e| ExtractError::ReadFile {
            path: path.clone(),
            source: e,
        })?;
        let items: Vec<CuratedItem> =
            serde_yml::from_str(&contents).map_err(|e| ExtractError::Yaml {
                path: path.clone(),
                source: e,
            })?;
        log::debug!("{}: {} curated items", path.display(), items.len());
        all.extend(items);
    }
    Ok(all)
}
