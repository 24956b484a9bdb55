//! Wire format for a stored entry.
//!
//! ```text
//! offset  size  field
//! 0       8     expiry_ms, signed 64-bit, little-endian
//! 8       N     payload, opaque bytes
//! ```
//!
//! Byte order is fixed to little-endian, not the host's native order, so a
//! directory stays readable across machines of differing endianness.

use crate::entry::SpilledEntry;
use crate::error::{SpillError, SpillResult};

const HEADER_LEN: usize = 8;

/// Frame `expiry_ms` and `payload` into the bytes stored as the store value.
pub fn encode(expiry_ms: i64, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&expiry_ms.to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Recover `(expiry_ms, payload)` from a stored value.
///
/// Invariant 1: every stored value is at least 8 bytes long.
pub fn decode(value: &[u8]) -> SpillResult<SpilledEntry> {
    if value.len() < HEADER_LEN {
        return Err(SpillError::CorruptedData);
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&value[..HEADER_LEN]);
    let expiry_ms = i64::from_le_bytes(header);
    let payload = value[HEADER_LEN..].to_vec();
    Ok(SpilledEntry::new(expiry_ms, payload))
}

/// Decode only the header, without copying the payload — used by the
/// sweeper, which never needs the payload bytes.
pub fn decode_expiry(value: &[u8]) -> Option<i64> {
    if value.len() < HEADER_LEN {
        return None;
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&value[..HEADER_LEN]);
    Some(i64::from_le_bytes(header))
}
