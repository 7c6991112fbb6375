use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("data file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("data file has no rows: {0}")]
    EmptySource(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    Schema(Vec<String>),

    #[error("CSV parsing failed: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to derive salary metrics: {0}")]
    Derivation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Missing column names when this is a schema failure.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            PipelineError::Schema(cols) => Some(cols),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
