//! Config & lifecycle: the single owning context for the store handle,
//! counters, and sweeper thread across load → running → teardown — one
//! struct coordinating sub-component state, with `load`/`unload` bracketing
//! the object's lifetime.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::commands::{cleanup_reply, restore_reply};
use crate::config::Config;
use crate::decoder::{self, PRE_MISS_EVENT};
use crate::encoder::{self, PRE_EVICTION_EVENT};
use crate::error::{SpillError, SpillResult};
use crate::host::{Host, HostReply};
use crate::info::{config_section, stats_section, InfoFields};
use crate::stats::Stats;
use crate::store::Store;
use crate::sweeper::{self, PeriodicSweeper, SweepSummary};

/// The spill tier module: the process-wide context a host binding creates
/// at load time and drops at unload.
pub struct SpillModule {
    config: Config,
    store: Arc<Store>,
    stats: Arc<Stats>,
    sweeper: Option<PeriodicSweeper>,
}

impl SpillModule {
    /// Parse `args`, open the store, seed `num_keys_stored` from a startup
    /// reconciliation scan, and start the periodic sweeper if enabled. Any
    /// failure here unwinds whatever was acquired so far — `Store::close`
    /// and the sweeper's `Drop` impl are both no-ops on never-opened state,
    /// so simply dropping a partially constructed `SpillModule` is safe.
    pub fn load(args: &[(String, String)]) -> SpillResult<Self> {
        let config = Config::parse(args)?;

        let store = Arc::new(Store::new());
        store.open(&config)?;

        let stats = Arc::new(Stats::new());
        match sweeper::count_live_entries(&store) {
            Ok(count) => stats.seed_num_keys_stored(count),
            Err(e) => log::warn!("spilltier: startup reconciliation scan failed: {e}"),
        }

        let sweeper = PeriodicSweeper::spawn(store.clone(), stats.clone(), config.cleanup_interval_secs);

        Ok(Self {
            config,
            store,
            stats,
            sweeper,
        })
    }

    /// Tear down: stop and join the sweeper, then close the store. Safe to
    /// call (or drop without calling) even after a partial load failure.
    pub fn unload(&mut self) {
        if let Some(mut sweeper) = self.sweeper.take() {
            sweeper.stop_and_join();
        }
        self.store.close();
    }

    /// Dispatch a pre-eviction notification to the spill encoder (C2).
    pub fn on_pre_eviction(&self, event: &str, key: &[u8], host: &dyn Host) {
        encoder::on_pre_eviction(event, key, host, &self.store, &self.stats);
    }

    /// Dispatch a pre-miss notification to the restore decoder (C3).
    pub fn on_pre_miss(&self, event: &str, key: &[u8], host: &dyn Host) {
        decoder::on_pre_miss(event, key, host, &self.store, &self.stats);
    }

    /// The explicit `restore` command.
    pub fn restore_command(&self, key: &[u8], host: &dyn Host) -> HostReply {
        if !self.store.is_open() {
            return restore_reply(crate::decoder::RestoreOutcome::NotInitialized);
        }
        let outcome = decoder::restore(key, host, &self.store, &self.stats);
        restore_reply(outcome)
    }

    /// The on-demand `cleanup` command.
    pub fn cleanup_command(&self) -> HostReply {
        let never_stop = AtomicBool::new(false);
        let summary: SweepSummary = sweeper::sweep_once(&self.store, &self.stats, &never_stop);
        cleanup_reply(summary)
    }

    /// The info hook's `stats` section.
    pub fn stats_info(&self) -> InfoFields {
        stats_section(&self.stats.snapshot())
    }

    /// The info hook's `config` section.
    pub fn config_info(&self) -> InfoFields {
        config_section(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }
}

impl Drop for SpillModule {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Subscription tags a host binding registers these entry points under.
pub const PRE_EVICTION_SUBSCRIPTION: &str = PRE_EVICTION_EVENT;
pub const PRE_MISS_SUBSCRIPTION: &str = PRE_MISS_EVENT;

/// Render a load failure the way a host binding would report it: init
/// failures propagate as a fatal load error back to the host.
pub fn describe_load_error(err: &SpillError) -> String {
    format!("spilltier: fatal load error: {}", err.to_host_message())
}
