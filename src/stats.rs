//! Process-wide atomic counters.
//!
//! Mutated from the host's calling thread and the sweeper thread; every
//! update is a `fetch_add`/`fetch_sub`, every read a `load`, in the style
//! of `enterprise::ratelimit::algorithm`'s atomic counters — no lock
//! guards a stats field, so the info hook never contends with the hot
//! paths.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Stats {
    num_keys_stored: AtomicU64,
    total_keys_written: AtomicU64,
    total_keys_restored: AtomicU64,
    total_keys_cleaned: AtomicU64,
    last_num_keys_cleaned: AtomicU64,
    last_cleanup_at: AtomicI64,
    total_bytes_written: AtomicU64,
    total_bytes_read: AtomicU64,
    /// A pre-miss materialize failure is logged but never surfaced to the
    /// host; this counter gives operators visibility into how often that
    /// happens.
    total_materialize_failures: AtomicU64,
}

/// A point-in-time snapshot of [`Stats`], used by the info hook and the
/// on-demand cleanup reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub num_keys_stored: u64,
    pub total_keys_written: u64,
    pub total_keys_restored: u64,
    pub total_keys_cleaned: u64,
    pub last_num_keys_cleaned: u64,
    pub last_cleanup_at: i64,
    pub total_bytes_written: u64,
    pub total_bytes_read: u64,
    pub total_materialize_failures: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `num_keys_stored` from the startup reconciliation scan. Not
    /// atomic with respect to concurrent callers — there are none yet,
    /// load has not finished.
    pub fn seed_num_keys_stored(&self, count: u64) {
        self.num_keys_stored.store(count, Ordering::Relaxed);
    }

    pub fn record_write(&self, bytes_written: u64, is_new_key: bool) {
        self.total_keys_written.fetch_add(1, Ordering::Relaxed);
        self.total_bytes_written.fetch_add(bytes_written, Ordering::Relaxed);
        if is_new_key {
            self.num_keys_stored.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_restore(&self, bytes_read: u64) {
        self.total_keys_restored.fetch_add(1, Ordering::Relaxed);
        self.total_bytes_read.fetch_add(bytes_read, Ordering::Relaxed);
        self.num_keys_stored.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_expired_delete(&self) {
        self.num_keys_stored.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_materialize_failure(&self) {
        self.total_materialize_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self, cleaned: u64, now_secs: i64) {
        self.total_keys_cleaned.fetch_add(cleaned, Ordering::Relaxed);
        self.last_num_keys_cleaned.store(cleaned, Ordering::Relaxed);
        self.last_cleanup_at.store(now_secs, Ordering::Relaxed);
        self.num_keys_stored.fetch_sub(cleaned, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            num_keys_stored: self.num_keys_stored.load(Ordering::Relaxed),
            total_keys_written: self.total_keys_written.load(Ordering::Relaxed),
            total_keys_restored: self.total_keys_restored.load(Ordering::Relaxed),
            total_keys_cleaned: self.total_keys_cleaned.load(Ordering::Relaxed),
            last_num_keys_cleaned: self.last_num_keys_cleaned.load(Ordering::Relaxed),
            last_cleanup_at: self.last_cleanup_at.load(Ordering::Relaxed),
            total_bytes_written: self.total_bytes_written.load(Ordering::Relaxed),
            total_bytes_read: self.total_bytes_read.load(Ordering::Relaxed),
            total_materialize_failures: self.total_materialize_failures.load(Ordering::Relaxed),
        }
    }

    pub fn num_keys_stored(&self) -> u64 {
        self.num_keys_stored.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_increments_num_keys_only_for_new_key() {
        let stats = Stats::new();
        stats.record_write(10, true);
        stats.record_write(10, false);
        let snap = stats.snapshot();
        assert_eq!(snap.num_keys_stored, 1);
        assert_eq!(snap.total_keys_written, 2);
        assert_eq!(snap.total_bytes_written, 20);
    }

    #[test]
    fn restore_decrements_stored_and_increments_restored() {
        let stats = Stats::new();
        stats.seed_num_keys_stored(1);
        stats.record_restore(42);
        let snap = stats.snapshot();
        assert_eq!(snap.num_keys_stored, 0);
        assert_eq!(snap.total_keys_restored, 1);
        assert_eq!(snap.total_bytes_read, 42);
    }

    #[test]
    fn sweep_updates_last_cleanup_fields() {
        let stats = Stats::new();
        stats.seed_num_keys_stored(5);
        stats.record_sweep(3, 1_700_000_000);
        let snap = stats.snapshot();
        assert_eq!(snap.num_keys_stored, 2);
        assert_eq!(snap.total_keys_cleaned, 3);
        assert_eq!(snap.last_num_keys_cleaned, 3);
        assert_eq!(snap.last_cleanup_at, 1_700_000_000);
    }
}
