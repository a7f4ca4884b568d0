use std::path::PathBuf;

use thiserror::Error;

use crate::layout::GridError;
use crate::logging::LoggingError;

/// Unified result type for the portfolio crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Errors surfaced by the terminal portfolio.
///
/// None of these come from the interaction core: opening and closing tiles
/// is total over [`crate::TileId`]. They cover the ambient layers around it.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("failed to parse content file `{path}`: {source}")]
    Content {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse config file `{path}`: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_failures_surface_as_io() {
        let err: FolioError = std::io::Error::other("tty gone").into();
        assert!(matches!(err, FolioError::Io(_)));
        assert_eq!(err.to_string(), "tty gone");
    }
}
