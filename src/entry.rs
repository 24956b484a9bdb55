//! The spilled-entry data model.

/// Sentinel stored verbatim when the host reports "no TTL known" for a key
/// (host `PTTL` reply of `-1`).
pub const EXPIRY_NO_TTL: i64 = -1;

/// Sentinel stored verbatim when the host reports the key was already gone
/// at capture time (host `PTTL` reply of `-2`). The encoder does not
/// special-case this away: it is carried through verbatim, and a later
/// restore treats any `expiry_ms <= 0` as "no expiry."
pub const EXPIRY_KEY_ABSENT: i64 = -2;

/// `0` means "no expiry" on the wire; restore treats any value `<= 0` the
/// same way (see [`EXPIRY_NO_TTL`], [`EXPIRY_KEY_ABSENT`]).
pub const EXPIRY_NONE: i64 = 0;

/// A captured key awaiting or recovered from the store: an absolute expiry
/// deadline plus the host's opaque serialized form of the key's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpilledEntry {
    pub expiry_ms: i64,
    pub payload: Vec<u8>,
}

impl SpilledEntry {
    pub fn new(expiry_ms: i64, payload: Vec<u8>) -> Self {
        Self { expiry_ms, payload }
    }

    /// Invariant 2: an entry with a positive absolute deadline at or before
    /// `now_ms` must never be surfaced.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expiry_ms > 0 && self.expiry_ms <= now_ms
    }

    /// The TTL the host should be told about on restore: `max(1, expiry -
    /// now)` for a finite future deadline, `0` ("no expiry") otherwise.
    pub fn restore_ttl_ms(&self, now_ms: i64) -> i64 {
        if self.expiry_ms > 0 {
            (self.expiry_ms - now_ms).max(1)
        } else {
            0
        }
    }
}
