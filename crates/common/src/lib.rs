//! Shared types and utilities for the lumen game core.
//!
//! Everything here is plain data with no knowledge of worlds or the game loop.

pub mod config;
pub mod time;
pub mod types;

pub use config::{Config, ConfigError};
pub use time::{Clock, ManualClock, MonotonicClock, TimeDelta};
pub use types::{EntityId, Transform};

pub fn crate_info() -> &'static str {
    "lumen-common v0.1.0"
}
