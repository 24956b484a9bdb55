//! Smoke binary exercising load → spill → restore → sweep against a real
//! directory. Not the host-plugin entry point itself (the crate is a
//! library consumed by a host binding) — a manual-verification aid, the
//! one place in this crate allowed to initialize a logger, mirroring how
//! the teacher's own `main.rs` is the only place that calls
//! `env_logger::Builder::from_env`.

use std::collections::HashMap;
use std::sync::Mutex;

use spilltier::host::{Host, HostResult, PttlReply};
use spilltier::SpillModule;

/// A toy in-memory keyspace standing in for the real host server: enough
/// to demonstrate the pre-eviction / pre-miss round trip end to end.
struct DemoHost {
    live: Mutex<HashMap<Vec<u8>, (Vec<u8>, Option<i64>)>>,
}

impl DemoHost {
    fn new() -> Self {
        Self {
            live: Mutex::new(HashMap::new()),
        }
    }

    fn set(&self, key: &[u8], value: &[u8], ttl_ms: Option<i64>) {
        self.live
            .lock()
            .unwrap()
            .insert(key.to_vec(), (value.to_vec(), ttl_ms));
    }

    fn evict(&self, key: &[u8]) {
        self.live.lock().unwrap().remove(key);
    }
}

impl Host for DemoHost {
    fn serialize(&self, key: &[u8]) -> HostResult<Vec<u8>> {
        self.live
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| "no such key".to_string())
    }

    fn pttl(&self, key: &[u8]) -> PttlReply {
        match self.live.lock().unwrap().get(key) {
            Some((_, Some(ttl))) => PttlReply::Finite(*ttl),
            Some((_, None)) => PttlReply::NoExpiry,
            None => PttlReply::KeyAbsent,
        }
    }

    fn materialize(&self, key: &[u8], payload: &[u8], ttl_ms: i64) -> HostResult<()> {
        let ttl = if ttl_ms > 0 { Some(ttl_ms) } else { None };
        self.set(key, payload, ttl);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = tempfile::tempdir()?;
    log::info!("spilltier-bench: using scratch directory {:?}", dir.path());

    let module = SpillModule::load(&[
        ("path".to_string(), dir.path().to_string_lossy().to_string()),
        ("max-memory".to_string(), (32 * 1024 * 1024).to_string()),
        ("cleanup-interval".to_string(), "0".to_string()),
    ])
    .map_err(|e| anyhow::anyhow!(spilltier::module::describe_load_error(&e)))?;

    let host = DemoHost::new();
    host.set(b"session:42", b"opaque-payload-bytes", Some(60_000));

    log::info!("spilling session:42 on simulated pre-eviction");
    module.on_pre_eviction(spilltier::module::PRE_EVICTION_SUBSCRIPTION, b"session:42", &host);
    host.evict(b"session:42");

    log::info!("restoring session:42 via explicit command");
    let reply = module.restore_command(b"session:42", &host);
    log::info!("restore reply: {reply:?}");

    log::info!("stats: {:?}", module.stats_info());
    log::info!("config: {:?}", module.config_info());

    Ok(())
}
