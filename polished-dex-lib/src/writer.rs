//! JSON output under the output directory.
//!
//! Every file is written to a temporary sibling and renamed into place, so
//! a reader never sees a half-written record. Trainer backfill depends on
//! this: it reads species files back during the same run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polished_dex_core::{DiagnosticKind, Diagnostics};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PipelineError;

pub const POKEMON_DIR: &str = "pokemon";
pub const MOVES_DIR: &str = "moves";
pub const ITEMS_DIR: &str = "items";
pub const LOCATIONS_DIR: &str = "locations";
pub const TRAINERS_DIR: &str = "trainers";
pub const EVOLUTION_DIR: &str = "evolution";

const RECORD_DIRS: &[&str] = &[
    POKEMON_DIR,
    MOVES_DIR,
    ITEMS_DIR,
    LOCATIONS_DIR,
    TRAINERS_DIR,
    EVOLUTION_DIR,
];

pub const POKEMON_MANIFEST: &str = "pokemon_manifest.json";
pub const MOVES_MANIFEST: &str = "moves_manifest.json";
pub const ITEMS_MANIFEST: &str = "items_manifest.json";
pub const LOCATIONS_MANIFEST: &str = "locations_manifest.json";
pub const TRAINER_MANIFEST: &str = "trainer_manifest.json";
pub const ABILITIES_MANIFEST: &str = "abilities_manifest.json";
pub const EVOLUTION_MANIFEST: &str = "evolution_manifest.json";
pub const STATIC_MANIFEST: &str = "static_pokemon_manifest.json";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsReport<'a> {
    generated_at: String,
    total: usize,
    summary: BTreeMap<DiagnosticKind, usize>,
    entries: &'a Diagnostics,
}

#[derive(Debug)]
pub struct OutputWriter {
    root: PathBuf,
    written: usize,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the output root and every record directory.
    pub fn prepare(&self) -> Result<(), PipelineError> {
        for dir in RECORD_DIRS {
            let path = self.root.join(dir);
            std::fs::create_dir_all(&path)
                .map_err(|source| PipelineError::WriteFile { path, source })?;
        }
        Ok(())
    }

    /// Files written so far.
    pub fn files_written(&self) -> usize {
        self.written
    }

    /// Path of the record `<dir>/<id>.json`.
    pub fn record_path(&self, dir: &str, id: &str) -> PathBuf {
        self.root.join(dir).join(format!("{id}.json"))
    }

    /// Write one per-entity record.
    pub fn write_record<T: Serialize + ?Sized>(
        &mut self,
        dir: &str,
        id: &str,
        value: &T,
    ) -> Result<PathBuf, PipelineError> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(PipelineError::other(format!(
                "refusing to write {dir} record with id '{id}'"
            )));
        }
        let path = self.record_path(dir, id);
        self.write_to(path, value)
    }

    /// Write a top-level file such as a manifest.
    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        file_name: &str,
        value: &T,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.root.join(file_name);
        self.write_to(path, value)
    }

    fn write_to<T: Serialize + ?Sized>(&mut self, path: PathBuf, value: &T) -> Result<PathBuf, PipelineError> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        let tmp = path.with_extension("json.tmp");
        if let Err(source) = std::fs::write(&tmp, json) {
            return Err(PipelineError::WriteFile { path: tmp, source });
        }
        std::fs::rename(&tmp, &path).map_err(|source| PipelineError::WriteFile {
            path: path.clone(),
            source,
        })?;
        self.written += 1;
        Ok(path)
    }

    /// Read back a record written earlier in the run.
    pub fn read_record<T: DeserializeOwned>(&self, dir: &str, id: &str) -> Result<T, PipelineError> {
        let path = self.record_path(dir, id);
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| PipelineError::ReadFile { path, source })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// `diagnostics.json`: a per-kind summary and every entry.
    pub fn write_diagnostics(&mut self, diagnostics: &Diagnostics) -> Result<PathBuf, PipelineError> {
        let report = DiagnosticsReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total: diagnostics.len(),
            summary: diagnostics.summary(),
            entries: diagnostics,
        };
        self.write_json(DIAGNOSTICS_FILE, &report)
    }
}
