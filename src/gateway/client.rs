// Sui-Lite Binder: Blocking Client
//
// Minimal synchronous caller for a service registered in a socket
// registry. One connection carries any number of sequential transactions.

use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use crate::binder::{Parcel, Reply};

use super::protocol::{check_frame_len, ReplyFrame, TransactionFrame, FLAG_ONEWAY};
use super::TransportError;

pub struct BinderClient {
    stream: UnixStream,
}

impl BinderClient {
    /// Connect to a service socket.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let stream = UnixStream::connect(path)?;
        Ok(Self { stream })
    }

    /// Resolve `name` in a socket registry directory and connect to it.
    pub fn connect_service(registry_dir: &Path, name: &str) -> Result<Self, TransportError> {
        Self::connect(registry_dir.join(name))
    }

    /// Bound how long a call may wait on the service.
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    /// Perform a two-way transaction and wait for its reply.
    pub fn transact(&mut self, code: u32, data: &Parcel) -> Result<Reply, TransportError> {
        self.send(code, 0, data)?;
        let body = self.read_frame()?;
        ReplyFrame::decode(&body)?.into_reply()
    }

    /// Fire a one-way transaction; no reply is sent back.
    pub fn transact_oneway(&mut self, code: u32, data: &Parcel) -> Result<(), TransportError> {
        self.send(code, FLAG_ONEWAY, data)
    }

    fn send(&mut self, code: u32, flags: u32, data: &Parcel) -> Result<(), TransportError> {
        let frame = TransactionFrame::new(code, flags, data).encode()?;
        self.stream.write_all(&frame)?;
        self.stream.flush()?;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut len_bytes = [0u8; 4];
        self.stream.read_exact(&mut len_bytes).map_err(closed_on_eof)?;

        let len = check_frame_len(u32::from_le_bytes(len_bytes))?;
        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).map_err(closed_on_eof)?;
        Ok(body)
    }
}

fn closed_on_eof(e: std::io::Error) -> TransportError {
    if e.kind() == ErrorKind::UnexpectedEof {
        TransportError::ConnectionClosed
    } else {
        TransportError::Io(e)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
