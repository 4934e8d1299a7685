use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading experiment output, building curves or running the experiment
#[derive(Error, Debug)]
pub enum PlotError {
    /// Input file missing or unreadable
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be created or written
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed numeric content
    #[error("{origin}:{line}: {message}")]
    Format {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Interpolation is undefined for the given curve
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}

impl PlotError {
    pub fn format(origin: &str, line: usize, message: impl Into<String>) -> Self {
        PlotError::Format {
            origin: origin.to_string(),
            line,
            message: message.into(),
        }
    }
}

pub type PlotResult<T> = Result<T, PlotError>;
