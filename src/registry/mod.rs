// Sui-Lite Binder: Service Registry
//
// A system-wide directory mapping names to binder objects. Registration
// either fully succeeds (the name resolves for other processes) or fails as
// a whole; no partially registered state is left behind.

mod error;
mod memory;
mod socket;

use std::sync::Arc;

use crate::binder::Binder;

pub use error::RegistryError;
pub use memory::{MemoryRegistry, RegistrationPolicy};
pub use socket::SocketRegistry;

/// Longest accepted service name, in bytes.
pub const MAX_NAME_LEN: usize = 127;

/// A named-service registry.
pub trait ServiceRegistry {
    /// Publish `service` under `name`.
    fn add_service(&self, name: &str, service: Arc<dyn Binder>) -> Result<(), RegistryError>;

    /// Whether `name` currently resolves to a live service.
    fn check_service(&self, name: &str) -> bool;

    /// Names of all registered services, sorted.
    fn list_services(&self) -> Result<Vec<String>, RegistryError>;
}

impl<T: ServiceRegistry + ?Sized> ServiceRegistry for Arc<T> {
    fn add_service(&self, name: &str, service: Arc<dyn Binder>) -> Result<(), RegistryError> {
        (**self).add_service(name, service)
    }

    fn check_service(&self, name: &str) -> bool {
        (**self).check_service(name)
    }

    fn list_services(&self) -> Result<Vec<String>, RegistryError> {
        (**self).list_services()
    }
}

/// Reject names that cannot be published as a single registry entry.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\0');
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
