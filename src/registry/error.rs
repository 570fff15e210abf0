// Sui-Lite Binder: Registry error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Permission denied registering '{name}': {reason}")]
    Denied { name: String, reason: String },

    #[error("Service '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Registry unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid service name: {0:?}")]
    InvalidName(String),

    #[error("Registry I/O error: {0}")]
    Io(#[from] io::Error),
}
