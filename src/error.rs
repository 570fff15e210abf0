// Sui-Lite Binder: Top-level error types
//
// Aggregates errors from the transport, registry and dispatch loop into a
// single error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Sui-Lite Binder operations.
#[derive(Debug, Error)]
pub enum SuiLiteError {
    #[error("Dispatch loop error: {0}")]
    Looper(#[from] crate::launcher::LooperError),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::registry::RegistryError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::gateway::TransportError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SuiLiteError>;
