//! # Stratus
//!
//! Caching and statistics core of a weather-provider front.
//!
//! Upstream weather entities are kept in per-kind TTL caches keyed by
//! location, and the daily mean temperature of every fetch feeds a
//! statistic store from which descriptive statistics and anomalies are
//! computed on demand.
//!
//! ## Modules
//!
//! - [`cache`] - Per-entity TTL caches
//! - [`statistics`] - Sample store, pure statistics and the orchestrating service
//! - [`provider`] - Upstream provider seam and the cache-or-fetch service
//! - [`rpc`] - JSON-RPC boundary over stdio
//! - [`clock`] - Injectable time source
//! - [`cli`] - Command line interface
//! - [`types`] - Shared types

pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod provider;
pub mod rpc;
pub mod statistics;
pub mod types;

pub use types::config::Config;
pub use types::errors::{StratusError, StratusResult};
