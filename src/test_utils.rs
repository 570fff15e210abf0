// Sui-Lite Binder: Test Utilities
//
// Fixed identities and a log capture helper, so tests can assert on the
// audit log without touching real process state.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::service::IdentityProvider;

/// Identity provider returning fixed values.
#[derive(Debug)]
pub struct FixedIdentity {
    pub uid: u32,
    pub gid: u32,
    pub pid: u32,
    pub label: String,
    label_reads: AtomicUsize,
}

impl FixedIdentity {
    pub fn new(uid: u32, pid: u32, label: &str) -> Self {
        Self {
            uid,
            gid: uid,
            pid,
            label: label.to_string(),
            label_reads: AtomicUsize::new(0),
        }
    }

    /// How many times the security label has been requested.
    pub fn label_reads(&self) -> usize {
        self.label_reads.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_uid(&self) -> u32 {
        self.uid
    }

    fn current_gid(&self) -> u32 {
        self.gid
    }

    fn current_pid(&self) -> u32 {
        self.pid
    }

    fn current_security_label(&self) -> String {
        self.label_reads.fetch_add(1, Ordering::SeqCst);
        self.label.clone()
    }
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
