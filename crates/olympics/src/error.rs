//! Error types for the Olympics pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
///
/// Only fatal conditions live here. Cells that fail coercion and rows that
/// miss during a join are recovered in place and never surface as errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Error reading or writing a file.
    #[error("IO error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no header to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A stage needs a column the table does not have.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PipelineError {
    /// Wrap an I/O error, mapping a missing file to [`PipelineError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PipelineError::NotFound { path }
        } else {
            PipelineError::Io { path, source }
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
