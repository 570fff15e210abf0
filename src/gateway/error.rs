// Sui-Lite Binder: Transport error types

use std::io;

use thiserror::Error;

use super::protocol::MAX_FRAME_SIZE;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Frame too large: {size} bytes (max {MAX_FRAME_SIZE})")]
    FrameTooLarge { size: usize },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Transaction failed with status {0}")]
    Status(i32),

    #[error("Parcel error: {0}")]
    Parcel(#[from] crate::binder::ParcelError),
}
