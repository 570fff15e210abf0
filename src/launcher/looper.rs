// Sui-Lite Binder: Dispatch Loop
//
// The looper owns the runtime that hosts transport workers and parks the
// main thread until the process is told to stop. A termination signal or a
// `LoopStopper` are the only ways out.

use std::sync::Arc;

use tokio::runtime::{Handle, Runtime};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

use super::LooperError;

/// Why the dispatch loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// SIGTERM
    Terminated,
    /// SIGINT
    Interrupted,
    /// [`LoopStopper::stop`] was called.
    Stopped,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::Terminated => write!(f, "SIGTERM"),
            ExitReason::Interrupted => write!(f, "SIGINT"),
            ExitReason::Stopped => write!(f, "stop requested"),
        }
    }
}

/// Handle for ending a running loop from another thread.
#[derive(Clone)]
pub struct LoopStopper {
    tx: Arc<watch::Sender<bool>>,
}

impl LoopStopper {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

pub struct Looper {
    runtime: Runtime,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl Looper {
    /// Build the dispatch context with `worker_threads` transport workers.
    pub fn prepare(worker_threads: usize) -> Result<Self, LooperError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("binder-worker")
            .enable_all()
            .build()
            .map_err(LooperError::Runtime)?;

        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            runtime,
            stop_tx: Arc::new(stop_tx),
        })
    }

    /// Runtime handle on which services are served.
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn stopper(&self) -> LoopStopper {
        LoopStopper {
            tx: self.stop_tx.clone(),
        }
    }

    /// Block the calling thread until SIGTERM, SIGINT, or a stop request.
    ///
    /// Served connections keep running on the worker threads meanwhile; they
    /// are torn down when the looper is dropped on return.
    pub fn run(self) -> Result<ExitReason, LooperError> {
        let mut stop_rx = self.stop_tx.subscribe();

        self.runtime.block_on(async move {
            let mut terminate = signal(SignalKind::terminate()).map_err(LooperError::Signal)?;
            let mut interrupt = signal(SignalKind::interrupt()).map_err(LooperError::Signal)?;

            let reason = tokio::select! {
                _ = terminate.recv() => ExitReason::Terminated,
                _ = interrupt.recv() => ExitReason::Interrupted,
                _ = stop_rx.wait_for(|stopped| *stopped) => ExitReason::Stopped,
            };
            Ok(reason)
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
