// Sui-Lite Binder: Parcel Codec
//
// A flat, little-endian container for transaction payloads. Values are
// written in order and read back in the same order; there is no schema.
// Layout follows the binder convention: 32-bit integers, length-prefixed
// strings padded to 4 bytes, and a leading exception header on replies.

use super::ParcelError;

/// Exception header value meaning "no exception occurred".
pub const EX_NONE: i32 = 0;

/// Length prefix used for a null string.
const NULL_STRING_LEN: i32 = -1;

/// A transaction payload with a read cursor.
#[derive(Debug, Clone, Default)]
pub struct Parcel {
    data: Vec<u8>,
    pos: usize,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap received bytes for reading. The cursor starts at the beginning.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the cursor and the end of the data.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    // ─── Writers ─────────────────────────────────────────────────────────────

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a length-prefixed UTF-8 string, or a null marker for `None`.
    pub fn write_string(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.write_i32(s.len() as i32);
                self.data.extend_from_slice(s.as_bytes());
                let padding = (4 - s.len() % 4) % 4;
                self.data.extend(std::iter::repeat(0u8).take(padding));
            }
            None => self.write_i32(NULL_STRING_LEN),
        }
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_string(Some(value));
    }

    /// Reply header for a call that completed without an exception.
    pub fn write_no_exception(&mut self) {
        self.write_i32(EX_NONE);
    }

    /// Reply header for a call that failed with an application exception.
    pub fn write_exception(&mut self, code: i32, message: &str) {
        debug_assert_ne!(code, EX_NONE);
        self.write_i32(code);
        self.write_str(message);
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    pub fn read_i32(&mut self) -> Result<i32, ParcelError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ParcelError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a string written by [`Parcel::write_string`]. `None` is a null string.
    pub fn read_string(&mut self) -> Result<Option<String>, ParcelError> {
        let len = self.read_i32()?;
        if len == NULL_STRING_LEN {
            return Ok(None);
        }
        if len < 0 {
            return Err(ParcelError::InvalidLength(len));
        }

        let len = len as usize;
        let padding = (4 - len % 4) % 4;
        let bytes = self.take(len)?.to_vec();
        self.take(padding)?;

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| ParcelError::InvalidUtf8)
    }

    /// Read a string that must not be null.
    pub fn read_str(&mut self) -> Result<String, ParcelError> {
        self.read_string()?.ok_or(ParcelError::NullString)
    }

    /// Consume the reply exception header, surfacing a remote exception as an error.
    pub fn read_exception(&mut self) -> Result<(), ParcelError> {
        let code = self.read_i32()?;
        if code == EX_NONE {
            return Ok(());
        }
        let message = self.read_string()?.unwrap_or_default();
        Err(ParcelError::RemoteException { code, message })
    }

    fn take(&mut self, n: usize) -> Result<&[u8], ParcelError> {
        if self.remaining() < n {
            return Err(ParcelError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
