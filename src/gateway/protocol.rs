// Sui-Lite Binder: Wire Frames
//
// Transactions travel over a stream socket as length-prefixed frames:
//
//   request: u32 len | u32 code | u32 flags | payload
//   reply:   u32 len | i32 status | payload
//
// `len` counts everything after itself. All integers are little-endian.
// A reply status of UNKNOWN_TRANSACTION with an empty payload is the
// transport's default answer for codes the service does not implement.

use crate::binder::{Parcel, Reply};

use super::TransportError;

/// Largest frame body accepted in either direction (16 KB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024;

/// The caller does not wait for a reply.
pub const FLAG_ONEWAY: u32 = 0x01;

// Transport status codes
pub const STATUS_OK: i32 = 0;
pub const UNKNOWN_TRANSACTION: i32 = -74;

const REQUEST_HEADER_LEN: usize = 8;
const REPLY_HEADER_LEN: usize = 4;

/// Validate a length prefix read off the wire.
pub fn check_frame_len(len: u32) -> Result<usize, TransportError> {
    let len = len as usize;
    if len > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge { size: len });
    }
    Ok(len)
}

fn with_length_prefix(body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
    if body.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge { size: body.len() });
    }
    // Header and body go out in a single write
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// An incoming call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFrame {
    pub code: u32,
    pub flags: u32,
    pub data: Vec<u8>,
}

impl TransactionFrame {
    pub fn new(code: u32, flags: u32, data: &Parcel) -> Self {
        Self {
            code,
            flags,
            data: data.as_bytes().to_vec(),
        }
    }

    pub fn is_oneway(&self) -> bool {
        self.flags & FLAG_ONEWAY != 0
    }

    /// Encode as a complete frame, length prefix included.
    pub fn encode(&self) -> Result<Vec<u8>, TransportError> {
        let mut body = Vec::with_capacity(REQUEST_HEADER_LEN + self.data.len());
        body.extend_from_slice(&self.code.to_le_bytes());
        body.extend_from_slice(&self.flags.to_le_bytes());
        body.extend_from_slice(&self.data);
        with_length_prefix(body)
    }

    /// Decode a frame body (length prefix already consumed).
    pub fn decode(body: &[u8]) -> Result<Self, TransportError> {
        if body.len() < REQUEST_HEADER_LEN {
            return Err(TransportError::InvalidFrame(format!(
                "transaction frame too short: {} bytes",
                body.len()
            )));
        }
        Ok(Self {
            code: le_u32(&body[0..4]),
            flags: le_u32(&body[4..8]),
            data: body[REQUEST_HEADER_LEN..].to_vec(),
        })
    }
}

/// An outgoing reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFrame {
    pub status: i32,
    pub data: Vec<u8>,
}

impl ReplyFrame {
    /// Map a service reply onto the wire, applying the transport default for
    /// unhandled codes.
    pub fn from_reply(reply: Reply) -> Self {
        match reply {
            Reply::Handled(parcel) => Self {
                status: STATUS_OK,
                data: parcel.into_bytes(),
            },
            Reply::Unhandled => Self {
                status: UNKNOWN_TRANSACTION,
                data: Vec::new(),
            },
        }
    }

    /// Inverse of [`ReplyFrame::from_reply`]. Unknown statuses are errors.
    pub fn into_reply(self) -> Result<Reply, TransportError> {
        match self.status {
            STATUS_OK => Ok(Reply::Handled(Parcel::from_bytes(self.data))),
            UNKNOWN_TRANSACTION => Ok(Reply::Unhandled),
            other => Err(TransportError::Status(other)),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, TransportError> {
        let mut body = Vec::with_capacity(REPLY_HEADER_LEN + self.data.len());
        body.extend_from_slice(&self.status.to_le_bytes());
        body.extend_from_slice(&self.data);
        with_length_prefix(body)
    }

    pub fn decode(body: &[u8]) -> Result<Self, TransportError> {
        if body.len() < REPLY_HEADER_LEN {
            return Err(TransportError::InvalidFrame(format!(
                "reply frame too short: {} bytes",
                body.len()
            )));
        }
        Ok(Self {
            status: le_u32(&body[0..4]) as i32,
            data: body[REPLY_HEADER_LEN..].to_vec(),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
