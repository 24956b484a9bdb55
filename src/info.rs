//! Stats & introspection: the info hook's two sections. All counter reads
//! are plain atomic loads (via [`Stats::snapshot`]); this hook never
//! acquires a lock that could contend with the encoder, decoder, or
//! sweeper.

use crate::config::Config;
use crate::stats::StatsSnapshot;

/// One `field => value` entry in an info section. A host binding renders
/// these into whatever reply shape its own info protocol expects.
pub type InfoFields = Vec<(&'static str, String)>;

/// The `stats` section.
pub fn stats_section(snapshot: &StatsSnapshot) -> InfoFields {
    vec![
        ("num_keys_stored", snapshot.num_keys_stored.to_string()),
        ("total_keys_written", snapshot.total_keys_written.to_string()),
        ("total_keys_restored", snapshot.total_keys_restored.to_string()),
        ("total_keys_cleaned", snapshot.total_keys_cleaned.to_string()),
        ("last_num_keys_cleaned", snapshot.last_num_keys_cleaned.to_string()),
        ("last_cleanup_at", snapshot.last_cleanup_at.to_string()),
        ("total_bytes_written", snapshot.total_bytes_written.to_string()),
        ("total_bytes_read", snapshot.total_bytes_read.to_string()),
        (
            "total_materialize_failures",
            snapshot.total_materialize_failures.to_string(),
        ),
    ]
}

/// The `config` section.
pub fn config_section(config: &Config) -> InfoFields {
    vec![
        ("path", config.path.clone()),
        ("max_memory_bytes", config.max_memory.to_string()),
        (
            "cleanup_interval_seconds",
            config.cleanup_interval_secs.to_string(),
        ),
    ]
}
