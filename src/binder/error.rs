// Sui-Lite Binder: Parcel error types

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParcelError {
    #[error("Parcel truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid string length: {0}")]
    InvalidLength(i32),

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Unexpected null string")]
    NullString,

    #[error("Remote exception {code}: {message}")]
    RemoteException { code: i32, message: String },
}
