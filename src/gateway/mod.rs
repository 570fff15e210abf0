// Sui-Lite Binder: Gateway Module
//
// Unix Domain Socket transport for binder objects: length-prefixed
// transaction frames, a per-service socket server with caller logging,
// and a blocking client.

mod caller;
mod client;
mod error;
pub mod protocol;
mod uds;

pub use caller::CallerInfo;
pub use client::BinderClient;
pub use error::TransportError;
pub use uds::{Fingerprint, UdsServer};
