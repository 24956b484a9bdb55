//! The embedded LSM-tree-like store and its lifecycle guard.
//!
//! `sled` is the teacher's own embedded-key-value-store dependency
//! (originally reached for in `Cargo.toml` as a caching backend); its knob
//! surface does not line up one-to-one with a RocksDB-shaped tuning recipe
//! (no block-based table options, no bloom filter parameter, no separate
//! read/write-option structs), so the *intent* of each knob is carried over
//! onto `sled::Config`'s actual surface (documented per-field below) rather
//! than the literal option names.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{SpillError, SpillResult};

/// Lifecycle state of the store handle: uninitialized → open → closed, no
/// I/O outside open.
#[derive(Debug, Clone)]
enum StoreState {
    Uninitialized,
    Open(sled::Db),
    Closed,
}

/// Owns the embedded store across its open/close lifecycle. Shared between
/// the host's calling thread and the sweeper thread; `sled::Db` is
/// internally reference-counted and synchronized, so this wrapper adds no
/// locking around individual operations, only around the state transition
/// itself.
#[derive(Debug)]
pub struct Store {
    state: RwLock<StoreState>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::Uninitialized),
        }
    }

    /// Open the store directory with tuning derived from `config.max_memory`:
    /// 8 MiB reserved for the page-cache-equivalent (`cache_capacity`'s
    /// floor), the remainder driving sled's own cache budget;
    /// `Mode::LowSpace` favors denser on-disk layout the way dynamic-level-
    /// bytes compaction does; async flush (no per-write fsync) relies on
    /// the store's own WAL for crash safety.
    pub fn open(&self, config: &Config) -> SpillResult<()> {
        let sled_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.max_memory.max(crate::config::BLOCK_CACHE_BYTES))
            .mode(sled::Mode::LowSpace)
            .use_compression(true)
            .flush_every_ms(None);

        let db = sled_config
            .open()
            .map_err(|e| SpillError::StoreOpen(e.to_string()))?;

        *self.state.write() = StoreState::Open(db);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.state.read(), StoreState::Open(_))
    }

    /// A cheap, cloned handle to the open database, or `NotInitialized` if
    /// the store is not currently open. `sled::Db` clones are Arc clones.
    pub fn handle(&self) -> SpillResult<sled::Db> {
        match &*self.state.read() {
            StoreState::Open(db) => Ok(db.clone()),
            _ => Err(SpillError::NotInitialized),
        }
    }

    /// Tear down the store. Safe to call from any state, including after a
    /// partial init failure — only the `Open` state does real work.
    pub fn close(&self) {
        let mut state = self.state.write();
        if matches!(*state, StoreState::Open(_)) {
            if let StoreState::Open(db) = std::mem::replace(&mut *state, StoreState::Closed) {
                if let Err(e) = db.flush() {
                    log::warn!("spilltier: error flushing store during teardown: {e}");
                }
            }
        } else {
            *state = StoreState::Closed;
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-shareable handle to the store, suitable for handing to the
/// sweeper thread.
pub type SharedStore = Arc<Store>;

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> Config {
        Config {
            path: dir.path().to_string_lossy().to_string(),
            max_memory: crate::config::MIN_MAX_MEMORY,
            cleanup_interval_secs: 0,
            verify_checksums: false,
        }
    }

    #[test]
    fn starts_uninitialized() {
        let store = Store::new();
        assert!(!store.is_open());
        assert!(matches!(store.handle(), Err(SpillError::NotInitialized)));
    }

    #[test]
    fn open_then_close_transitions_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new();
        store.open(&test_config(&dir)).unwrap();
        assert!(store.is_open());
        assert!(store.handle().is_ok());

        store.close();
        assert!(!store.is_open());
        assert!(matches!(store.handle(), Err(SpillError::NotInitialized)));
    }

    #[test]
    fn close_before_open_is_a_no_op() {
        let store = Store::new();
        store.close();
        assert!(!store.is_open());
    }
}
