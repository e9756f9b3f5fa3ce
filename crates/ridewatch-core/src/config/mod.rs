//! Configuration system for ridewatch.
//! TOML-based, layered resolution: env > project > user > defaults.

pub mod query_config;
pub mod ridewatch_config;
pub mod storage_config;
pub mod tracker_config;

pub use query_config::QueryConfig;
pub use ridewatch_config::RidewatchConfig;
pub use storage_config::StorageConfig;
pub use tracker_config::{DeadlineArming, TrackerConfig};
