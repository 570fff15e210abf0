// Sui-Lite Binder: Process Identity
//
// Reports who this process is running as: numeric uid/gid, pid, and the
// security-domain label the kernel assigned to it. Every read goes back to
// the operating system; nothing is cached, since the audit harness may
// inspect the process while it runs.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Well-known location of the process's own security attribute.
pub const DEFAULT_ATTR_PATH: &str = "/proc/self/attr/current";

/// Label reported when the attribute cannot be read.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Source of the live process identity.
///
/// Injected into the endpoint and launcher so tests can substitute fixed
/// values for the real operating-system state.
pub trait IdentityProvider: Send + Sync {
    fn current_uid(&self) -> u32;
    fn current_gid(&self) -> u32;
    fn current_pid(&self) -> u32;
    /// The security-domain label. Never fails: unreadable labels are
    /// reported as [`UNKNOWN_LABEL`].
    fn current_security_label(&self) -> String;
}

/// Identity backed by the running process.
#[derive(Debug, Clone)]
pub struct SystemIdentity {
    attr_path: PathBuf,
}

impl SystemIdentity {
    pub fn new() -> Self {
        Self::with_attr_path(DEFAULT_ATTR_PATH)
    }

    /// Read the security label from a different attribute file.
    pub fn with_attr_path(attr_path: impl Into<PathBuf>) -> Self {
        Self {
            attr_path: attr_path.into(),
        }
    }

    pub fn attr_path(&self) -> &Path {
        &self.attr_path
    }
}

impl Default for SystemIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for SystemIdentity {
    fn current_uid(&self) -> u32 {
        nix::unistd::getuid().as_raw()
    }

    fn current_gid(&self) -> u32 {
        nix::unistd::getgid().as_raw()
    }

    fn current_pid(&self) -> u32 {
        std::process::id()
    }

    fn current_security_label(&self) -> String {
        read_security_label(&self.attr_path)
    }
}

/// Read the first line of a security attribute file.
///
/// The file is opened fresh on each call. Surrounding whitespace and the
/// trailing NUL some kernels append are stripped. A missing file, a read
/// error, or empty content all yield [`UNKNOWN_LABEL`].
pub fn read_security_label(path: &Path) -> String {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Security attribute unreadable");
            return UNKNOWN_LABEL.to_string();
        }
    };

    let mut line = String::new();
    if let Err(e) = BufReader::new(file).read_line(&mut line) {
        tracing::debug!(path = %path.display(), error = %e, "Security attribute read failed");
        return UNKNOWN_LABEL.to_string();
    }

    let label = line.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if label.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        label.to_string()
    }
}

/// A point-in-time snapshot of the process identity, used for logging and
/// for the `identity` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessIdentity {
    pub uid: u32,
    pub gid: u32,
    pub pid: u32,
    pub security_label: String,
}

impl ProcessIdentity {
    pub fn capture(provider: &dyn IdentityProvider) -> Self {
        Self {
            uid: provider.current_uid(),
            gid: provider.current_gid(),
            pid: provider.current_pid(),
            security_label: provider.current_security_label(),
        }
    }
}

impl std::fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "UID={} GID={} PID={} ctx={}",
            self.uid, self.gid, self.pid, self.security_label
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
