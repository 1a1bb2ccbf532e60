use std::path::PathBuf;
use thiserror::Error;

use super::IoError;

#[derive(Error, Debug)]
pub enum RemediationError {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("no class implementing {interface} found in '{path}'")]
    NoJobClass { path: PathBuf, interface: String },
}

impl RemediationError {
    pub fn no_job_class(path: impl Into<PathBuf>, interface: impl Into<String>) -> Self {
        Self::NoJobClass {
            path: path.into(),
            interface: interface.into(),
        }
    }
}
