//! Load-argument parsing and the module's static configuration.

use crate::error::{SpillError, SpillResult};

/// 20 MiB — the floor below which `max_memory` is a fatal load error.
pub const MIN_MAX_MEMORY: u64 = 20 * 1024 * 1024;

/// 256 MiB — default `max_memory` when unspecified.
pub const DEFAULT_MAX_MEMORY: u64 = 256 * 1024 * 1024;

/// 300 seconds — default sweeper period when unspecified.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// 8 MiB reserved for the store's read cache regardless of `max_memory`.
pub const BLOCK_CACHE_BYTES: u64 = 8 * 1024 * 1024;

/// Parsed module configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory backing the embedded store. Required.
    pub path: String,
    /// Total RAM budget for the store, in bytes. Minimum 20 MiB.
    pub max_memory: u64,
    /// Sweeper period in seconds. `0` disables the periodic sweeper.
    pub cleanup_interval_secs: u64,
    /// Verify checksums on read. Off by default, but exposed for operators
    /// who need at-rest integrity over latency.
    pub verify_checksums: bool,
}

impl Config {
    /// Parse a flat list of alternating keys and values, as handed to the
    /// module by the host at load time. Unknown keys are ignored.
    pub fn parse(args: &[(String, String)]) -> SpillResult<Self> {
        let mut path: Option<String> = None;
        let mut max_memory = DEFAULT_MAX_MEMORY;
        let mut cleanup_interval_secs = DEFAULT_CLEANUP_INTERVAL_SECS;
        let mut verify_checksums = false;

        for (key, value) in args {
            match key.as_str() {
                "path" => path = Some(value.clone()),
                "max-memory" | "max_memory" => {
                    max_memory = value
                        .parse::<u64>()
                        .map_err(|_| SpillError::Config(format!("invalid max-memory: {value}")))?;
                }
                "cleanup-interval" | "cleanup_interval" => {
                    let parsed = value
                        .parse::<i64>()
                        .map_err(|_| SpillError::Config(format!("invalid cleanup-interval: {value}")))?;
                    if parsed < 0 {
                        return Err(SpillError::Config(
                            "cleanup-interval must not be negative".to_string(),
                        ));
                    }
                    cleanup_interval_secs = parsed as u64;
                }
                "verify-checksums" | "verify_checksums" => {
                    verify_checksums = value == "1" || value.eq_ignore_ascii_case("true");
                }
                _ => {
                    log::debug!("spilltier: ignoring unknown load argument '{key}'");
                }
            }
        }

        let path = path.ok_or_else(|| SpillError::Config("missing required 'path'".to_string()))?;

        if max_memory < MIN_MAX_MEMORY {
            return Err(SpillError::Config(format!(
                "max-memory must be at least {MIN_MAX_MEMORY} bytes, got {max_memory}"
            )));
        }

        Ok(Config {
            path,
            max_memory,
            cleanup_interval_secs,
            verify_checksums,
        })
    }
}
