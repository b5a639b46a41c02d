//! User settings: where the source tree lives, where output goes and how
//! the pipeline runs.
//!
//! The settings file is `~/.config/polished-dex/settings.toml`:
//!
//! ```toml
//! [source]
//! root = "/home/me/polishedcrystal"
//! curated_items = "/home/me/dex-curated"
//!
//! [output]
//! dir = "/home/me/dex-out"
//!
//! [pipeline]
//! workers = 8
//! strict_conditionals = false
//! keep_debug_locations = false
//! ```
//!
//! Every value resolves through the same chain: command-line flag, then
//! the settings file, then a built-in default.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::pipeline::{DEFAULT_WORKERS, PipelineOptions};

/// Output directory used when neither a flag nor the settings file names one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub output: OutputSettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub root: Option<PathBuf>,
    pub curated_items: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub workers: Option<usize>,
    pub strict_conditionals: bool,
    pub keep_debug_locations: bool,
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("polished-dex").join("settings.toml")
}

/// Load the settings file, falling back to defaults when it is absent or
/// unreadable.
pub fn load_settings() -> Settings {
    let path = settings_path();
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring settings file {}: {e}", path.display());
            Settings::default()
        }
    }
}

/// Parse the settings file at `path`. A missing file is not an error.
pub fn load_settings_from(path: &Path) -> Result<Settings, PipelineError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(PipelineError::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(toml::from_str(&contents)?)
}

/// The settings file as pretty-printed TOML, for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Save (or clear) `[source] root`.
pub fn save_source_root(path: Option<&Path>) -> io::Result<()> {
    save_path_value(&settings_path(), "source", "root", path)
}

/// Save (or clear) `[output] dir`.
pub fn save_output_dir(path: Option<&Path>) -> io::Result<()> {
    save_path_value(&settings_path(), "output", "dir", path)
}

/// Update one `[section] key` entry of the settings file at `settings`.
///
/// Edits go through `toml::Value` so keys this function does not know
/// about survive the rewrite.
pub(crate) fn save_path_value(
    settings: &Path,
    section: &str,
    key: &str,
    value: Option<&Path>,
) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(settings) {
        Ok(contents) => contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default())),
        Err(_) => toml::Value::Table(Default::default()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section_table = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{section}] is not a table")))?;

    match value {
        Some(p) => {
            section_table.insert(
                key.to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            section_table.remove(key);
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;
    Ok(())
}

impl Settings {
    /// Source root: flag, then `[source] root`, then the current directory.
    pub fn resolve_source_root(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.source.root.clone())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Output directory: flag, then `[output] dir`, then `./output`.
    pub fn resolve_output_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn resolve_workers(&self, cli_override: Option<usize>) -> usize {
        cli_override
            .or(self.pipeline.workers)
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_WORKERS)
    }

    /// Pipeline options with every value resolved.
    pub fn pipeline_options(
        &self,
        source: Option<PathBuf>,
        output: Option<PathBuf>,
        workers: Option<usize>,
    ) -> PipelineOptions {
        PipelineOptions {
            source_root: self.resolve_source_root(source),
            output_dir: self.resolve_output_dir(output),
            workers: self.resolve_workers(workers),
            strict_conditionals: self.pipeline.strict_conditionals,
            keep_debug_locations: self.pipeline.keep_debug_locations,
            curated_items: self.source.curated_items.clone(),
        }
    }
}
