//! The spill encoder: the pre-eviction capture path.

use crate::codec;
use crate::entry::{EXPIRY_KEY_ABSENT, EXPIRY_NO_TTL};
use crate::host::{Host, PttlReply};
use crate::stats::Stats;
use crate::store::Store;

/// Expected event-kind tag for the pre-eviction subscription. Any other
/// event name is a no-op.
pub const PRE_EVICTION_EVENT: &str = "pre-eviction";

fn now_ms() -> i64 {
    crate::clock::now_ms()
}

/// Handle a pre-eviction notification for `key`. Never raises: failures are
/// logged and the call simply skips the write.
pub fn on_pre_eviction(event: &str, key: &[u8], host: &dyn Host, store: &Store, stats: &Stats) {
    if event != PRE_EVICTION_EVENT {
        return;
    }
    if !store.is_open() {
        return;
    }

    let payload = match host.serialize(key) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("spilltier: serialize failed for key, skipping spill: {e}");
            return;
        }
    };

    let expiry_ms = match host.pttl(key) {
        PttlReply::Finite(pttl) if pttl > 0 => now_ms() + pttl,
        PttlReply::Finite(pttl) => pttl,
        PttlReply::NoExpiry => EXPIRY_NO_TTL,
        // A capture/read race: stored verbatim rather than skipped, so the
        // sentinel itself survives the round trip for the caller to see.
        PttlReply::KeyAbsent => EXPIRY_KEY_ABSENT,
        PttlReply::Unknown => EXPIRY_NO_TTL,
    };

    let framed = codec::encode(expiry_ms, &payload);
    let bytes_written = framed.len() as u64;

    // Best-effort: decide whether this is a new logical insertion. Errors
    // other than "not found" are ignored; worst case a new key is slightly
    // over-counted as an overwrite or vice versa.
    let is_new_key = match store.handle() {
        Ok(db) => match db.get(key) {
            Ok(existing) => existing.is_none(),
            Err(e) => {
                log::debug!("spilltier: pre-write existence probe failed, assuming new key: {e}");
                true
            }
        },
        Err(_) => return,
    };

    let db = match store.handle() {
        Ok(db) => db,
        Err(_) => return,
    };

    match db.insert(key, framed) {
        Ok(_) => {
            stats.record_write(bytes_written, is_new_key);
        }
        Err(e) => {
            log::warn!("spilltier: store write failed during spill: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostResult;
    use std::cell::RefCell;

    struct FakeHost {
        payload: Vec<u8>,
        pttl: PttlReply,
        serialize_calls: RefCell<u32>,
    }

    impl Host for FakeHost {
        fn serialize(&self, _key: &[u8]) -> HostResult<Vec<u8>> {
            *self.serialize_calls.borrow_mut() += 1;
            Ok(self.payload.clone())
        }
        fn pttl(&self, _key: &[u8]) -> PttlReply {
            self.pttl
        }
        fn materialize(&self, _key: &[u8], _payload: &[u8], _ttl_ms: i64) -> HostResult<()> {
            Ok(())
        }
    }

    fn opened_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new();
        store
            .open(&crate::config::Config {
                path: dir.path().to_string_lossy().to_string(),
                max_memory: crate::config::MIN_MAX_MEMORY,
                cleanup_interval_secs: 0,
                verify_checksums: false,
            })
            .unwrap();
        (dir, store)
    }

    #[test]
    fn ignores_events_that_are_not_pre_eviction() {
        let (_dir, store) = opened_store();
        let stats = Stats::new();
        let host = FakeHost {
            payload: b"v".to_vec(),
            pttl: PttlReply::NoExpiry,
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction("some-other-event", b"k", &host, &store, &stats);
        assert_eq!(*host.serialize_calls.borrow(), 0);
        assert_eq!(stats.num_keys_stored(), 0);
    }

    #[test]
    fn spills_with_finite_ttl() {
        let (_dir, store) = opened_store();
        let stats = Stats::new();
        let host = FakeHost {
            payload: b"\x01\x02\x03".to_vec(),
            pttl: PttlReply::Finite(60_000),
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction(PRE_EVICTION_EVENT, b"foo", &host, &store, &stats);

        let db = store.handle().unwrap();
        let stored = db.get(b"foo").unwrap().unwrap();
        let entry = codec::decode(&stored).unwrap();
        assert!(entry.expiry_ms > now_ms());
        assert_eq!(entry.payload, b"\x01\x02\x03");
        assert_eq!(stats.num_keys_stored(), 1);
    }

    #[test]
    fn overwrite_does_not_double_increment_num_keys_stored() {
        let (_dir, store) = opened_store();
        let stats = Stats::new();
        let host_v1 = FakeHost {
            payload: b"v1".to_vec(),
            pttl: PttlReply::NoExpiry,
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction(PRE_EVICTION_EVENT, b"k", &host_v1, &store, &stats);

        let host_v2 = FakeHost {
            payload: b"v2".to_vec(),
            pttl: PttlReply::NoExpiry,
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction(PRE_EVICTION_EVENT, b"k", &host_v2, &store, &stats);

        let snap = stats.snapshot();
        assert_eq!(snap.num_keys_stored, 1);
        assert_eq!(snap.total_keys_written, 2);

        let db = store.handle().unwrap();
        let stored = db.get(b"k").unwrap().unwrap();
        let entry = codec::decode(&stored).unwrap();
        assert_eq!(entry.payload, b"v2");
    }

    #[test]
    fn key_absent_sentinel_is_stored_verbatim() {
        let (_dir, store) = opened_store();
        let stats = Stats::new();
        let host = FakeHost {
            payload: b"v".to_vec(),
            pttl: PttlReply::KeyAbsent,
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction(PRE_EVICTION_EVENT, b"k", &host, &store, &stats);

        let db = store.handle().unwrap();
        let stored = db.get(b"k").unwrap().unwrap();
        let entry = codec::decode(&stored).unwrap();
        assert_eq!(entry.expiry_ms, EXPIRY_KEY_ABSENT);
    }

    #[test]
    fn no_op_when_store_not_open() {
        let store = Store::new();
        let stats = Stats::new();
        let host = FakeHost {
            payload: b"v".to_vec(),
            pttl: PttlReply::NoExpiry,
            serialize_calls: RefCell::new(0),
        };
        on_pre_eviction(PRE_EVICTION_EVENT, b"k", &host, &store, &stats);
        assert_eq!(*host.serialize_calls.borrow(), 0);
    }
}
