// Sui-Lite Binder: Socket Registry
//
// Registry backed by a directory of Unix sockets: a service named `foo` is
// reachable at `<dir>/foo`. The directory and its access policy belong to
// the host; a caller without write access to it is denied registration.
// Registered services are served on the dispatch runtime passed in at
// construction, which must be running before any registration.

use std::fs;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::UnixStream as StdUnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::UnixListener;
use tokio::runtime::Handle;

use crate::binder::Binder;
use crate::gateway::UdsServer;

use super::{validate_name, RegistryError, ServiceRegistry};

pub struct SocketRegistry {
    dir: PathBuf,
    runtime: Handle,
}

impl SocketRegistry {
    pub fn new(dir: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            dir: dir.into(),
            runtime,
        }
    }

    /// Default registry directory: `$XDG_RUNTIME_DIR/sui-lite/services`.
    /// Falls back to `/tmp/sui-lite/services`.
    pub fn default_dir() -> PathBuf {
        dirs_next::runtime_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("sui-lite")
            .join("services")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Socket path at which `name` is published.
    pub fn service_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn ensure_dir(&self) -> Result<(), RegistryError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(RegistryError::Unavailable {
                path: self.dir.clone(),
                source: io::Error::new(io::ErrorKind::Other, "not a directory"),
            }),
            Err(e) => Err(RegistryError::Unavailable {
                path: self.dir.clone(),
                source: e,
            }),
        }
    }

    /// Clear a leftover socket from a previous run. Live sockets and
    /// non-socket files are left alone.
    fn reclaim(&self, name: &str, path: &Path) -> Result<(), RegistryError> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(self.classify(name, e)),
        };

        if !meta.file_type().is_socket() {
            return Err(RegistryError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a socket", path.display()),
            )));
        }

        match Occupant::from_connect(StdUnixStream::connect(path)) {
            Occupant::Live => Err(RegistryError::AlreadyRegistered(name.to_string())),
            Occupant::Unreachable(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Existing socket left in place");
                Err(self.classify(name, e))
            }
            Occupant::Stale => {
                match fs::remove_file(path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(self.classify(name, e)),
                }
                tracing::debug!(path = %path.display(), "Removed stale service socket");
                Ok(())
            }
        }
    }

    fn classify(&self, name: &str, e: io::Error) -> RegistryError {
        match e.kind() {
            io::ErrorKind::PermissionDenied => RegistryError::Denied {
                name: name.to_string(),
                reason: e.to_string(),
            },
            io::ErrorKind::NotFound => RegistryError::Unavailable {
                path: self.dir.clone(),
                source: e,
            },
            _ => RegistryError::Io(e),
        }
    }
}

/// Who holds an existing socket path, judged by connecting to it.
#[derive(Debug)]
enum Occupant {
    /// A listener accepted the connection.
    Live,
    /// Nobody listens; the file is left over from a previous run.
    Stale,
    /// The connection failed for another reason, e.g. the socket belongs to
    /// a different uid. Ownership is unknown, so the file stays.
    Unreachable(io::Error),
}

impl Occupant {
    fn from_connect<T>(result: io::Result<T>) -> Self {
        match result {
            Ok(_) => Occupant::Live,
            Err(e) => match e.kind() {
                io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => Occupant::Stale,
                _ => Occupant::Unreachable(e),
            },
        }
    }
}

impl ServiceRegistry for SocketRegistry {
    fn add_service(&self, name: &str, service: Arc<dyn Binder>) -> Result<(), RegistryError> {
        validate_name(name)?;
        self.ensure_dir()?;

        let path = self.service_path(name);
        self.reclaim(name, &path)?;

        let listener = {
            let _guard = self.runtime.enter();
            UnixListener::bind(&path).map_err(|e| self.classify(name, e))?
        };

        let server = UdsServer::new(name, listener, service);
        self.runtime.spawn(server.run());

        Ok(())
    }

    fn check_service(&self, name: &str) -> bool {
        validate_name(name).is_ok() && StdUnixStream::connect(self.service_path(name)).is_ok()
    }

    fn list_services(&self) -> Result<Vec<String>, RegistryError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| RegistryError::Unavailable {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_socket() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{Parcel, Reply};
    use crate::gateway::BinderClient;
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    struct Answer(i32);

    impl Binder for Answer {
        fn descriptor(&self) -> &str {
            "test.Answer"
        }

        fn transact(&self, code: u32, _data: &Parcel) -> Reply {
            if code != 1 {
                return Reply::Unhandled;
            }
            let mut reply = Parcel::new();
            reply.write_i32(self.0);
            Reply::Handled(reply)
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_registered_service_is_reachable() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());

        registry.add_service("answer", Arc::new(Answer(42))).unwrap();
        assert!(registry.check_service("answer"));

        let mut client = BinderClient::connect_service(dir.path(), "answer").unwrap();
        let mut reply = client.transact(1, &Parcel::new()).unwrap().into_parcel().unwrap();
        assert_eq!(reply.read_i32().unwrap(), 42);
        assert!(!client.transact(2, &Parcel::new()).unwrap().is_handled());
    }

    #[test]
    fn test_live_name_cannot_be_taken_twice() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());

        registry.add_service("answer", Arc::new(Answer(1))).unwrap();
        let err = registry.add_service("answer", Arc::new(Answer(2))).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered(_)));

        // The original registration still answers
        let mut client = BinderClient::connect(registry.service_path("answer")).unwrap();
        let mut reply = client.transact(1, &Parcel::new()).unwrap().into_parcel().unwrap();
        assert_eq!(reply.read_i32().unwrap(), 1);
    }

    #[test]
    fn test_stale_socket_is_reclaimed() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        registry.add_service("answer", Arc::new(Answer(7))).unwrap();
        assert!(registry.check_service("answer"));
    }

    #[test]
    fn test_regular_file_is_not_replaced() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer");
        fs::write(&path, "keep me").unwrap();

        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        assert!(registry.add_service("answer", Arc::new(Answer(7))).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let registry = SocketRegistry::new(dir.path().join("absent"), rt.handle().clone());

        let err = registry.add_service("answer", Arc::new(Answer(0))).unwrap_err();
        assert!(matches!(err, RegistryError::Unavailable { .. }));
        assert!(!registry.check_service("answer"));
        assert!(registry.list_services().is_err());
    }

    #[test]
    fn test_list_services_only_reports_sockets() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README"), "not a service").unwrap();

        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        registry.add_service("zeta", Arc::new(Answer(0))).unwrap();
        registry.add_service("alpha", Arc::new(Answer(0))).unwrap();

        assert_eq!(
            registry.list_services().unwrap(),
            vec!["alpha".to_string(), "zeta".to_string()]
        );
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        assert!(matches!(
            registry.add_service("../escape", Arc::new(Answer(0))),
            Err(RegistryError::InvalidName(_))
        ));
        assert!(!registry.check_service("../escape"));
    }

    #[test]
    fn test_occupant_from_connect() {
        assert!(matches!(Occupant::from_connect(Ok(())), Occupant::Live));
        for kind in [io::ErrorKind::ConnectionRefused, io::ErrorKind::NotFound] {
            let result: io::Result<()> = Err(kind.into());
            assert!(matches!(Occupant::from_connect(result), Occupant::Stale));
        }
        for kind in [io::ErrorKind::PermissionDenied, io::ErrorKind::TimedOut] {
            let result: io::Result<()> = Err(kind.into());
            assert!(matches!(
                Occupant::from_connect(result),
                Occupant::Unreachable(e) if e.kind() == kind
            ));
        }
    }

    fn running_as_root() -> bool {
        nix::unistd::geteuid().is_root()
    }

    #[test]
    fn test_inaccessible_live_socket_is_not_stolen() {
        if running_as_root() {
            eprintln!("skipping: root bypasses socket permissions");
            return;
        }

        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer");
        let owner = std::os::unix::net::UnixListener::bind(&path).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
        let inode = fs::symlink_metadata(&path).unwrap().ino();

        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        let err = registry.add_service("answer", Arc::new(Answer(7))).unwrap_err();
        assert!(matches!(err, RegistryError::Denied { .. }), "got {err:?}");

        // The other owner's socket is still the one at the path
        assert_eq!(fs::symlink_metadata(&path).unwrap().ino(), inode);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        assert!(StdUnixStream::connect(&path).is_ok());
        drop(owner);
    }

    #[test]
    fn test_read_only_directory_is_denied() {
        if running_as_root() {
            eprintln!("skipping: root bypasses directory permissions");
            return;
        }

        let rt = runtime();
        let dir = tempfile::tempdir().unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let registry = SocketRegistry::new(dir.path(), rt.handle().clone());
        let result = registry.add_service("answer", Arc::new(Answer(0)));
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(RegistryError::Denied { name, reason }) => {
                assert_eq!(name, "answer");
                assert!(reason.contains("Permission denied"), "reason: {reason}");
            }
            other => panic!("expected Denied, got {other:?}"),
        }
        assert!(!registry.check_service("answer"));
    }

    #[test]
    fn test_default_dir() {
        let path = SocketRegistry::default_dir();
        assert!(path.ends_with("sui-lite/services"));
    }
}
