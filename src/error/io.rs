use std::path::PathBuf;
use thiserror::Error;

/// Per-path filesystem failures. These are recoverable: the engine records
/// them as diagnostics and moves on to the next sibling.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to stat '{path}': {source}")]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IoError {
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn metadata(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::ReadError { path, .. }
            | Self::WriteError { path, .. }
            | Self::Metadata { path, .. } => path,
        }
    }
}
