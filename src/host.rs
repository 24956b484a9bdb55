//! The abstract interface the spill tier requires from its embedding host
//! — the in-memory key-value server that owns keyspace events, command
//! dispatch, and opaque key serialization.
//!
//! This is the Rust-native replacement for the original's C struct of
//! function pointers: a trait the host binding implements once, and that
//! [`crate::module::SpillModule`] calls synchronously from whichever
//! thread the host invokes it on.

/// Result type for calls out to the host.
pub type HostResult<T> = Result<T, String>;

/// The host's reply to a remaining-TTL probe (`PTTL`-shaped). A non-integer
/// reply from the host is folded into [`PttlReply::Unknown`] by the binding
/// before it ever reaches the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PttlReply {
    /// A finite number of milliseconds remaining.
    Finite(i64),
    /// The key has no expiry set.
    NoExpiry,
    /// The key was not present (a capture/read race).
    KeyAbsent,
    /// The host's reply was not an integer reply at all.
    Unknown,
}

/// A reply the module hands back to the host for a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostReply {
    Ok,
    Null,
    Error(String),
    /// The `cleanup` command's four-element array reply.
    CleanupSummary { scanned: u64, cleaned: u64 },
}

/// The minimum capability surface required of the host.
///
/// Implemented once by whatever binds this crate to a concrete in-memory
/// server; [`crate::module::SpillModule`] is generic over it.
pub trait Host: Send + Sync {
    /// Serialize a live key's value to an opaque payload suitable for
    /// persisting and later materializing. Errors if the key has no value
    /// to serialize or the host rejects the call.
    fn serialize(&self, key: &[u8]) -> HostResult<Vec<u8>>;

    /// Probe a key's remaining time-to-live.
    fn pttl(&self, key: &[u8]) -> PttlReply;

    /// Materialize `key` from `payload`, applying `ttl_ms` (`0` meaning no
    /// expiry), replacing any existing in-memory value for the key.
    fn materialize(&self, key: &[u8], payload: &[u8], ttl_ms: i64) -> HostResult<()>;
}
