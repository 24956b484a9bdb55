//! Background and on-demand expiry reclamation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::clock::{now_ms, now_secs};
use crate::codec;
use crate::stats::Stats;
use crate::store::Store;

/// The result of one full sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub scanned: u64,
    pub cleaned: u64,
}

/// Scan the store forward once, deleting entries whose absolute expiry has
/// passed. `should_stop` is polled between entries so the periodic mode can
/// cut a sweep short on shutdown; the on-demand command passes a flag that
/// never trips.
pub fn sweep_once(store: &Store, stats: &Stats, should_stop: &AtomicBool) -> SweepSummary {
    let db = match store.handle() {
        Ok(db) => db,
        Err(_) => return SweepSummary { scanned: 0, cleaned: 0 },
    };

    let now = now_ms();
    let mut scanned: u64 = 0;
    let mut cleaned: u64 = 0;

    for item in db.iter() {
        if should_stop.load(Ordering::Relaxed) {
            break;
        }
        let (key, value) = match item {
            Ok(kv) => kv,
            Err(e) => {
                log::warn!("spilltier: sweeper iterator error: {e}");
                break;
            }
        };
        scanned += 1;

        if let Some(expiry_ms) = codec::decode_expiry(&value) {
            if expiry_ms > 0 && expiry_ms < now {
                if let Err(e) = db.remove(&key) {
                    log::warn!("spilltier: sweeper failed to delete expired key: {e}");
                } else {
                    cleaned += 1;
                }
            }
        }
    }

    stats.record_sweep(cleaned, now_secs());
    SweepSummary { scanned, cleaned }
}

/// Count entries that are live (`expiry_ms == 0` or in the future) as of
/// `now_ms`, used by the startup reconciliation scan.
pub fn count_live_entries(store: &Store) -> std::io::Result<u64> {
    let db = store.handle().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_host_message()))?;
    let now = now_ms();
    let mut count = 0u64;
    for item in db.iter() {
        let (_key, value) = item.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        match codec::decode_expiry(&value) {
            Some(expiry_ms) if expiry_ms == 0 || expiry_ms > now => count += 1,
            Some(_) => {}
            None => {}
        }
    }
    Ok(count)
}

/// The background sweeper thread: sleeps `interval` in 1-second slices so
/// shutdown stays responsive, then sweeps, repeating until signaled to stop.
pub struct PeriodicSweeper {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicSweeper {
    /// Spawn the sweeper thread. Returns `None` if `interval_secs == 0`
    /// (periodic sweeping disabled).
    pub fn spawn(store: Arc<Store>, stats: Arc<Stats>, interval_secs: u64) -> Option<Self> {
        if interval_secs == 0 {
            return None;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();

        let handle = std::thread::spawn(move || {
            let mut remaining = interval_secs;
            loop {
                if stop_for_thread.load(Ordering::Relaxed) {
                    return;
                }
                if remaining == 0 {
                    sweep_once(&store, &stats, &stop_for_thread);
                    remaining = interval_secs;
                } else {
                    std::thread::sleep(Duration::from_secs(1));
                    remaining -= 1;
                }
            }
        });

        Some(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and join it. Bounded by at most one
    /// 1-second sleep slice plus the time to finish the current sweep step.
    pub fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("spilltier: sweeper thread panicked during shutdown");
            }
        }
    }
}

impl Drop for PeriodicSweeper {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn opened_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new();
        store
            .open(&Config {
                path: dir.path().to_string_lossy().to_string(),
                max_memory: crate::config::MIN_MAX_MEMORY,
                cleanup_interval_secs: 0,
                verify_checksums: false,
            })
            .unwrap();
        (dir, store)
    }

    #[test]
    fn sweeps_only_expired_entries() {
        let (_dir, store) = opened_store();
        let stats = Stats::new();
        let db = store.handle().unwrap();
        let now = now_ms();

        db.insert(b"expired-1", codec::encode(now - 10_000, b"a")).unwrap();
        db.insert(b"expired-2", codec::encode(now - 1, b"b")).unwrap();
        db.insert(b"alive", codec::encode(now + 60_000, b"c")).unwrap();
        db.insert(b"no-ttl", codec::encode(0, b"d")).unwrap();

        let flag = AtomicBool::new(false);
        let summary = sweep_once(&store, &stats, &flag);

        assert_eq!(summary.scanned, 4);
        assert_eq!(summary.cleaned, 2);
        assert!(db.get(b"expired-1").unwrap().is_none());
        assert!(db.get(b"expired-2").unwrap().is_none());
        assert!(db.get(b"alive").unwrap().is_some());
        assert!(db.get(b"no-ttl").unwrap().is_some());
    }

    #[test]
    fn sweep_on_closed_store_does_nothing() {
        let store = Store::new();
        let stats = Stats::new();
        let flag = AtomicBool::new(false);
        let summary = sweep_once(&store, &stats, &flag);
        assert_eq!(summary, SweepSummary { scanned: 0, cleaned: 0 });
    }

    #[test]
    fn count_live_entries_excludes_expired() {
        let (_dir, store) = opened_store();
        let db = store.handle().unwrap();
        let now = now_ms();
        db.insert(b"expired", codec::encode(now - 10_000, b"a")).unwrap();
        db.insert(b"alive", codec::encode(now + 60_000, b"b")).unwrap();
        db.insert(b"no-ttl", codec::encode(0, b"c")).unwrap();

        assert_eq!(count_live_entries(&store).unwrap(), 2);
    }

    #[test]
    fn zero_interval_disables_periodic_sweeper() {
        let (_dir, store) = opened_store();
        let store = Arc::new(store);
        let stats = Arc::new(Stats::new());
        assert!(PeriodicSweeper::spawn(store, stats, 0).is_none());
    }
}
