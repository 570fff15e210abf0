// Sui-Lite Binder: Process Launcher
//
// Drives the process lifecycle:
//   1. Announce startup and the process identity
//   2. Read the security-domain label (best effort)
//   3. Prepare the dispatch loop
//   4. Construct the transaction endpoint
//   5. Register it under `sui_lite_binder` (failure is logged, not fatal)
//   6. Park in the dispatch loop
//
// A failed registration leaves the process running: its pid, identity and
// label stay observable, and the failure message itself lands in the log.

mod error;
mod looper;

use std::path::PathBuf;
use std::sync::Arc;

use crate::binder::Binder;
use crate::error::Result;
use crate::registry::{RegistryError, ServiceRegistry, SocketRegistry};
use crate::service::{
    IdentityProvider, ProcessIdentity, SystemIdentity, TransactionEndpoint, SERVICE_NAME,
};

pub use error::LooperError;
pub use looper::{ExitReason, LoopStopper, Looper};

/// Operator hints logged after a failed registration.
pub const REGISTRATION_HINTS: [&str; 2] = [
    "This is expected under SELinux Enforcing without custom policy.",
    "Check audit/selinux/binder_contexts.txt for denial details.",
];

pub const DEFAULT_WORKER_THREADS: usize = 4;

/// Resolved runtime settings for a launch.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub registry_dir: PathBuf,
    pub attr_path: PathBuf,
    pub worker_threads: usize,
}

/// Starts the endpoint and keeps the process resident.
pub struct ProcessLauncher {
    identity: Arc<dyn IdentityProvider>,
    worker_threads: usize,
}

/// A started service, ready to enter the dispatch loop.
pub struct RunningService {
    looper: Looper,
    endpoint: Arc<TransactionEndpoint>,
    identity: ProcessIdentity,
    registration: std::result::Result<(), RegistryError>,
}

impl ProcessLauncher {
    pub fn new(identity: Arc<dyn IdentityProvider>, worker_threads: usize) -> Self {
        Self {
            identity,
            worker_threads,
        }
    }

    /// Perform steps 1–5. `registry` is built once the dispatch loop exists,
    /// since serving a registered name needs its runtime.
    pub fn start<R, F>(&self, registry: F) -> Result<RunningService>
    where
        R: ServiceRegistry,
        F: FnOnce(&Looper) -> R,
    {
        tracing::info!("=== Sui-Lite Binder service starting ===");
        let identity = ProcessIdentity::capture(self.identity.as_ref());
        tracing::info!(
            uid = identity.uid,
            gid = identity.gid,
            pid = identity.pid,
            "UID={} PID={}",
            identity.uid,
            identity.pid
        );
        tracing::info!("SELinux context: {}", identity.security_label);

        let looper = Looper::prepare(self.worker_threads)?;
        let endpoint = Arc::new(TransactionEndpoint::new(self.identity.clone()));

        let registry = registry(&looper);
        let registration = register(&registry, endpoint.clone());
        match &registration {
            Ok(()) => {
                tracing::info!(name = SERVICE_NAME, "Binder service registered: {}", SERVICE_NAME);
            }
            Err(e) => {
                // Not fatal: keep going so the process stays inspectable
                tracing::error!(name = SERVICE_NAME, "Failed to register Binder service: {}", e);
                for hint in REGISTRATION_HINTS {
                    tracing::error!("{}", hint);
                }
            }
        }

        Ok(RunningService {
            looper,
            endpoint,
            identity,
            registration,
        })
    }
}

/// Single registration attempt; never retried.
fn register(
    registry: &dyn ServiceRegistry,
    endpoint: Arc<TransactionEndpoint>,
) -> std::result::Result<(), RegistryError> {
    registry.add_service(SERVICE_NAME, endpoint as Arc<dyn Binder>)
}

impl RunningService {
    /// The endpoint as constructed at startup, independent of registration.
    pub fn endpoint(&self) -> &Arc<TransactionEndpoint> {
        &self.endpoint
    }

    /// Identity captured at startup.
    pub fn identity(&self) -> &ProcessIdentity {
        &self.identity
    }

    pub fn registration(&self) -> std::result::Result<(), &RegistryError> {
        self.registration.as_ref().map(|_| ())
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_ok()
    }

    pub fn stopper(&self) -> LoopStopper {
        self.looper.stopper()
    }

    /// Step 6: block in the dispatch loop until the process is told to stop.
    pub fn run(self) -> Result<ExitReason> {
        tracing::info!(
            pid = self.identity.pid,
            "Entering main loop. Service alive at PID={}",
            self.identity.pid
        );
        let reason = self.looper.run()?;
        tracing::info!(%reason, "Dispatch loop exited");
        Ok(reason)
    }
}

/// Launch against the real process identity and the socket registry.
pub fn launch(config: &LaunchConfig) -> Result<ExitReason> {
    let identity = Arc::new(SystemIdentity::with_attr_path(&config.attr_path));
    let launcher = ProcessLauncher::new(identity, config.worker_threads);
    let service = launcher.start(|looper| {
        SocketRegistry::new(&config.registry_dir, looper.handle())
    })?;
    service.run()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
