//! Error taxonomy for the spill tier.
//!
//! Callback paths log and swallow these; command paths render them into a
//! host reply via [`SpillError::to_host_message`].

use thiserror::Error;

/// Errors that can arise while loading, running, or tearing down the spill module.
#[derive(Debug, Error)]
pub enum SpillError {
    /// Bad or missing load argument (`path` missing, `max_memory` too small,
    /// negative `cleanup_interval`, unparseable integer).
    #[error("configuration error: {0}")]
    Config(String),

    /// The embedded store refused to open.
    #[error("failed to open store: {0}")]
    StoreOpen(String),

    /// A put/get/delete/iterate call against the store failed.
    #[error("store I/O error: {0}")]
    StoreIo(String),

    /// A stored value was shorter than the 8-byte header, or otherwise
    /// inconsistent with the wire format.
    #[error("corrupted data")]
    CorruptedData,

    /// The entry was observed past its expiry at read time.
    #[error("key has expired")]
    Expired,

    /// The host rejected a serialize / materialize / TTL-probe call.
    #[error("host call failed: {0}")]
    HostCall(String),

    /// The store has not been opened (or has already been torn down).
    #[error("store not initialized")]
    NotInitialized,
}

pub type SpillResult<T> = Result<T, SpillError>;

impl SpillError {
    /// Render this error the way the `restore` command surfaces it to the host.
    pub fn to_host_message(&self) -> String {
        match self {
            SpillError::CorruptedData => "corrupted data".to_string(),
            SpillError::Expired => "key has expired".to_string(),
            SpillError::NotInitialized => "store not initialized".to_string(),
            SpillError::StoreIo(msg) => msg.clone(),
            SpillError::HostCall(msg) => msg.clone(),
            SpillError::Config(msg) => msg.clone(),
            SpillError::StoreOpen(msg) => msg.clone(),
        }
    }
}

impl From<sled::Error> for SpillError {
    fn from(err: sled::Error) -> Self {
        SpillError::StoreIo(err.to_string())
    }
}
