//! The restore decoder: shared algorithm behind the pre-miss callback and
//! the explicit `restore` command.

use crate::clock::now_ms;
use crate::codec;
use crate::error::SpillError;
use crate::host::Host;
use crate::stats::Stats;
use crate::store::Store;

/// Expected event-kind tag for the pre-miss subscription.
pub const PRE_MISS_EVENT: &str = "pre-miss";

/// The result of attempting a restore, independent of which entry point
/// (callback or command) is rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    NotFound,
    Expired,
    Corrupted,
    NotInitialized,
    InvalidKey,
    StoreError(String),
    HostError(String),
}

/// Run the shared restore algorithm for `key` against `store`, asking
/// `host` to materialize on success. This is the single implementation
/// both the pre-miss callback and the `restore` command render differently.
pub fn restore(key: &[u8], host: &dyn Host, store: &Store, stats: &Stats) -> RestoreOutcome {
    // A 0-byte key can never have been spilled (spec minimum key length is
    // 1 byte); reject it up front rather than letting it round-trip through
    // the store as a no-op lookup.
    if key.is_empty() {
        return RestoreOutcome::InvalidKey;
    }
    if !store.is_open() {
        return RestoreOutcome::NotInitialized;
    }

    let db = match store.handle() {
        Ok(db) => db,
        Err(_) => return RestoreOutcome::NotInitialized,
    };

    let value = match db.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return RestoreOutcome::NotFound,
        Err(e) => return RestoreOutcome::StoreError(e.to_string()),
    };

    let entry = match codec::decode(&value) {
        Ok(entry) => entry,
        Err(SpillError::CorruptedData) => return RestoreOutcome::Corrupted,
        Err(_) => return RestoreOutcome::Corrupted,
    };

    let now = now_ms();
    if entry.is_expired_at(now) {
        if let Err(e) = db.remove(key) {
            log::warn!("spilltier: failed to delete expired entry during restore: {e}");
        } else {
            stats.record_expired_delete();
        }
        return RestoreOutcome::Expired;
    }

    let ttl_ms = entry.restore_ttl_ms(now);

    match host.materialize(key, &entry.payload, ttl_ms) {
        Ok(()) => {
            let bytes_read = value.len() as u64;
            if let Err(e) = db.remove(key) {
                log::warn!("spilltier: failed to delete entry after successful restore: {e}");
            }
            stats.record_restore(bytes_read);
            RestoreOutcome::Restored
        }
        Err(e) => {
            // Entry is left intact: a failed materialization must not lose
            // the spilled copy.
            RestoreOutcome::HostError(e)
        }
    }
}

/// The pre-miss host callback: logs and returns, never raises, never
/// surfaces a materialize failure to the host — logged plus a dedicated
/// counter rather than silently dropped.
pub fn on_pre_miss(event: &str, key: &[u8], host: &dyn Host, store: &Store, stats: &Stats) {
    if event != PRE_MISS_EVENT {
        return;
    }
    match restore(key, host, store, stats) {
        RestoreOutcome::Restored | RestoreOutcome::NotFound => {}
        RestoreOutcome::Expired => {
            log::debug!("spilltier: key expired on pre-miss restore attempt");
        }
        RestoreOutcome::Corrupted => {
            log::warn!("spilltier: corrupted spilled entry encountered on pre-miss");
        }
        RestoreOutcome::NotInitialized => {}
        RestoreOutcome::InvalidKey => {}
        RestoreOutcome::StoreError(e) => {
            log::warn!("spilltier: store error on pre-miss restore: {e}");
        }
        RestoreOutcome::HostError(e) => {
            log::warn!("spilltier: host materialize failed on pre-miss restore: {e}");
            stats.record_materialize_failure();
        }
    }
}
