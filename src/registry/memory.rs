// Sui-Lite Binder: In-Process Registry
//
// Map-backed registry with a configurable admission policy. Lookups hand
// back the registered object itself, so callers transact without a socket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::binder::Binder;

use super::{validate_name, RegistryError, ServiceRegistry};

/// Admission policy applied to every registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationPolicy {
    AllowAll,
    /// Reject every registration with the given reason.
    DenyAll(String),
}

pub struct MemoryRegistry {
    policy: RegistrationPolicy,
    services: Mutex<HashMap<String, Arc<dyn Binder>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::with_policy(RegistrationPolicy::AllowAll)
    }

    /// A registry that refuses every registration with `reason`.
    pub fn denying(reason: impl Into<String>) -> Self {
        Self::with_policy(RegistrationPolicy::DenyAll(reason.into()))
    }

    pub fn with_policy(policy: RegistrationPolicy) -> Self {
        Self {
            policy,
            services: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a registered service.
    pub fn get_service(&self, name: &str) -> Option<Arc<dyn Binder>> {
        self.lock().get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<dyn Binder>>> {
        // The map is never left half-updated, so a poisoned lock is still usable
        self.services.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry for MemoryRegistry {
    fn add_service(&self, name: &str, service: Arc<dyn Binder>) -> Result<(), RegistryError> {
        validate_name(name)?;

        if let RegistrationPolicy::DenyAll(reason) = &self.policy {
            return Err(RegistryError::Denied {
                name: name.to_string(),
                reason: reason.clone(),
            });
        }

        let mut services = self.lock();
        if services.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        services.insert(name.to_string(), service);
        Ok(())
    }

    fn check_service(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    fn list_services(&self) -> Result<Vec<String>, RegistryError> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
