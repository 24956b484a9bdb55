//! # spilltier
//!
//! A spill tier for an in-memory key-value server: a host-plugin that
//! intercepts keys on the pre-eviction edge, persists their opaque
//! serialized form to a local, disk-backed LSM-tree-like store, and
//! rehydrates them transparently on the next pre-miss. Expiration
//! timestamps survive the round trip exactly.
//!
//! ## Architecture
//!
//! - `config`: load-argument parsing and the module's static configuration
//! - `host`: the abstract interface required of the embedding server
//! - `store`: the embedded store wrapper and its open/closed lifecycle
//! - `entry` / `codec`: the spilled-entry data model and its wire format
//! - `encoder`: the pre-eviction capture path
//! - `decoder`: the pre-miss / explicit-restore path
//! - `sweeper`: background and on-demand expiry reclamation
//! - `stats` / `info`: atomic counters and the info hook's two sections
//! - `commands`: command reply construction for `restore` and `cleanup`
//! - `module`: the top-level lifecycle object tying the above together
//!
//! This crate is consumed as a library by a concrete host binding — it has
//! no `main`, no network listener, and no opinion about how the host
//! dispatches its callbacks, only about what happens once they fire.

pub mod clock;
pub mod codec;
pub mod commands;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod entry;
pub mod error;
pub mod host;
pub mod info;
pub mod module;
pub mod stats;
pub mod store;
pub mod sweeper;

pub use config::Config;
pub use error::{SpillError, SpillResult};
pub use host::{Host, HostReply, HostResult, PttlReply};
pub use module::SpillModule;
pub use stats::{Stats, StatsSnapshot};

/// Crate version, re-exported for introspection.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name, re-exported for introspection.
pub const NAME: &str = env!("CARGO_PKG_NAME");
