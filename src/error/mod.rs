mod config;
mod io;
mod remediation;
mod scan;

pub use config::ConfigError;
pub use io::IoError;
pub use remediation::RemediationError;
pub use scan::ScanError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remediation(#[from] RemediationError),
}

pub type Result<T> = std::result::Result<T, Error>;
