// Sui-Lite Binder: Library root
//
// Re-exports the binder object model, transport, registry, service and
// launcher modules.

pub mod binder;
pub mod cli;
pub mod error;
pub mod gateway;
pub mod launcher;
pub mod registry;
pub mod service;

#[cfg(test)]
mod test_utils;

pub use error::{Result, SuiLiteError};
