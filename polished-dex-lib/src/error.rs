use std::path::PathBuf;

use polished_dex_extract::ExtractError;
use thiserror::Error;

/// Errors that stop a pipeline run or a settings operation.
///
/// Bad source data never ends up here; it is recorded as a diagnostic and
/// the run continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a file failed
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing an output file failed
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The configured source root is missing or not a directory
    #[error("Source tree not found: {0}")]
    SourceNotFound(PathBuf),

    /// A spawned read task failed to complete
    #[error("Task failed: {0}")]
    Task(String),

    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
