// Sui-Lite Binder: Launcher error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LooperError {
    #[error("Failed to build dispatch runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}
