use std::path::PathBuf;

/// Errors that can occur while extracting records from source text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error reading {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("Unterminated conditional in {source_name}: opened at line {line}")]
    UnterminatedConditional { source_name: String, line: usize },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl ExtractError {
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }
}
