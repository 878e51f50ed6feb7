//! Daily-temperature statistics.
//!
//! Samples are appended to a [`StatisticStore`] as current conditions are
//! fetched. [`StatisticsService`] answers queries once a location has enough
//! recent samples, running the [`StatisticsEngine`] over its whole history.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stratus::statistics::{StatisticStore, StatisticsService};
//! use stratus::types::config::StatisticsConfig;
//!
//! let config = StatisticsConfig::default();
//! let store = Arc::new(StatisticStore::new(&config));
//! let service = StatisticsService::new(store.clone(), &config);
//!
//! match service.get_statistics("Rome") {
//!     Ok(stats) => println!("mean {:.1}", stats.mean),
//!     Err(e) if e.is_insufficient_data() => println!("{}", e),
//!     Err(e) => return Err(e),
//! }
//! ```

mod engine;
mod service;
mod store;

pub use engine::{StatisticsEngine, DEFAULT_ANOMALY_THRESHOLD};
pub use service::StatisticsService;
pub use store::{StatisticStore, MAX_ABS_TEMPERATURE, SAMPLE_DATE_FORMAT};
