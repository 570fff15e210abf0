// Sui-Lite Binder: Unix Domain Socket Server
//
// Serves one binder object on a bound Unix socket. Each connection runs in
// its own tokio task and carries a sequence of transaction frames; the
// service is called directly from the task, so calls on different
// connections may execute concurrently on different worker threads.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

use crate::binder::{Binder, Parcel};

use super::caller::{fallback_actor, CallerInfo};
use super::protocol::{check_frame_len, ReplyFrame, TransactionFrame};
use super::TransportError;

/// Pause after a failed accept, so fd exhaustion does not spin the loop.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Resolves a peer's pid and uid to its executable fingerprint.
pub type Fingerprint = Arc<dyn Fn(u32, u32) -> io::Result<CallerInfo> + Send + Sync>;

/// Source of incoming connections.
pub(crate) trait Acceptor: Send {
    fn accept(&mut self) -> impl Future<Output = io::Result<UnixStream>> + Send;
}

impl Acceptor for UnixListener {
    fn accept(&mut self) -> impl Future<Output = io::Result<UnixStream>> + Send {
        async move { UnixListener::accept(self).await.map(|(stream, _addr)| stream) }
    }
}

/// Socket server for a single registered service.
pub struct UdsServer {
    name: String,
    listener: UnixListener,
    service: Arc<dyn Binder>,
    fingerprint: Fingerprint,
}

impl UdsServer {
    pub fn new(name: impl Into<String>, listener: UnixListener, service: Arc<dyn Binder>) -> Self {
        Self {
            name: name.into(),
            listener,
            service,
            fingerprint: Arc::new(CallerInfo::from_peer),
        }
    }

    /// Replace how connecting callers are fingerprinted for the log.
    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Accept connections until the runtime shuts down. Accept errors are
    /// logged and retried; the registered name stays served.
    pub async fn run(self) {
        tracing::debug!(
            name = %self.name,
            descriptor = self.service.descriptor(),
            "Service listening"
        );

        let UdsServer {
            name,
            mut listener,
            service,
            fingerprint,
        } = self;

        accept_loop(&name, &mut listener, |stream| {
            let service = service.clone();
            let fingerprint = fingerprint.clone();
            let name = name.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, service.as_ref(), fingerprint).await {
                    tracing::warn!(name = %name, error = %e, "Connection handler error");
                }
            });
        })
        .await
    }
}

async fn accept_loop<A, F>(name: &str, acceptor: &mut A, mut serve: F)
where
    A: Acceptor,
    F: FnMut(UnixStream),
{
    loop {
        match acceptor.accept().await {
            Ok(stream) => serve(stream),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Accept failed, retrying");
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

/// Resolve the peer of a connection into an audit actor string and log it.
///
/// The caller's binary is hashed on the blocking pool; transactions on the
/// connection do not wait for it.
fn announce_peer(stream: &UnixStream, fingerprint: Fingerprint) -> String {
    let cred = match stream.peer_cred() {
        Ok(cred) => cred,
        Err(e) => {
            tracing::debug!(error = %e, "Peer credentials unavailable");
            return "unknown-peer".to_string();
        }
    };

    let pid = cred.pid().map(|p| p as u32);
    let uid = cred.uid();
    let actor = fallback_actor(pid, uid);

    match pid {
        Some(pid) => {
            let fallback = actor.clone();
            tokio::task::spawn_blocking(move || match fingerprint(pid, uid) {
                Ok(info) => tracing::info!(%info, "Client connected"),
                Err(e) => tracing::info!(actor = %fallback, error = %e, "Client connected"),
            });
        }
        None => tracing::info!(actor = %actor, "Client connected"),
    }
    actor
}

/// Serve transactions on one connection until the peer hangs up.
async fn handle_connection(
    stream: UnixStream,
    service: &dyn Binder,
    fingerprint: Fingerprint,
) -> Result<(), TransportError> {
    let actor = announce_peer(&stream, fingerprint);
    let (mut reader, mut writer) = stream.into_split();

    while let Some(body) = read_frame(&mut reader).await? {
        let request = TransactionFrame::decode(&body)?;
        tracing::debug!(
            actor = %actor,
            code = request.code,
            flags = request.flags,
            len = request.data.len(),
            "Transaction"
        );

        let oneway = request.is_oneway();
        let reply = service.transact(request.code, &Parcel::from_bytes(request.data));
        if oneway {
            continue;
        }

        let frame = ReplyFrame::from_reply(reply).encode()?;
        write_frame(&mut writer, &frame).await?;
    }

    tracing::debug!(actor = %actor, "Client disconnected");
    Ok(())
}

/// Read one frame body. `None` means the peer closed between frames.
pub(crate) async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, TransportError>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = check_frame_len(u32::from_le_bytes(len_bytes))?;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            TransportError::ConnectionClosed
        } else {
            TransportError::Io(e)
        }
    })?;
    Ok(Some(body))
}

async fn write_frame<W>(writer: &mut W, frame: &[u8]) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(frame).await?;
    writer.flush().await?;
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
