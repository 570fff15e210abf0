// Sui-Lite Binder: Caller Identification
//
// Identifies the process on the other end of a transport connection from
// its peer credentials, resolving /proc/<pid>/exe and hashing the binary.
// The result only feeds the audit log; callers are never authenticated.

use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Information about a connected caller.
#[derive(Debug, Clone)]
pub struct CallerInfo {
    /// Process ID of the caller.
    pub pid: u32,
    /// Effective user ID of the caller.
    pub uid: u32,
    /// Resolved path to the caller's executable binary.
    pub exe_path: PathBuf,
    /// SHA-256 hex digest of the caller's executable binary.
    pub exe_hash: String,
}

impl CallerInfo {
    /// Build caller info from peer credentials.
    ///
    /// Fails when `/proc/<pid>/exe` cannot be resolved or read, e.g. for a
    /// caller running under a different uid without ptrace access.
    pub fn from_peer(pid: u32, uid: u32) -> io::Result<Self> {
        let proc_exe = format!("/proc/{}/exe", pid);
        let exe_path = fs::read_link(&proc_exe)?;

        let binary = fs::read(&exe_path)?;
        let hash = Sha256::digest(&binary);
        let exe_hash = hash.iter().map(|b| format!("{:02x}", b)).collect::<String>();

        Ok(Self {
            pid,
            uid,
            exe_path,
            exe_hash,
        })
    }

    /// Short actor string for the audit log.
    pub fn actor_string(&self) -> String {
        format!(
            "pid:{} uid:{} exe:{} hash:{}",
            self.pid,
            self.uid,
            self.exe_path.display(),
            &self.exe_hash[..16]
        )
    }
}

impl std::fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PID {} UID {} ({}) [{}…]",
            self.pid,
            self.uid,
            self.exe_path.display(),
            &self.exe_hash[..16]
        )
    }
}

/// Actor string for a caller whose binary could not be resolved.
pub fn fallback_actor(pid: Option<u32>, uid: u32) -> String {
    match pid {
        Some(pid) => format!("pid:{} uid:{}", pid, uid),
        None => format!("uid:{}", uid),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
