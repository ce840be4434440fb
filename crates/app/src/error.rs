//! Application error types

use std::path::PathBuf;

/// Application result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while starting the application. View models never return
/// these; they surface failures as message fields instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Core(#[from] streamia_core::Error),

    #[error("Network error: {0}")]
    Net(#[from] streamia_net::Error),
}
