#![doc = "Common types shared across the tick-sched workspace."]

pub mod config;
pub mod error;
pub mod metrics;
pub mod tick;

pub use config::*;
pub use error::*;
pub use metrics::*;
pub use tick::*;
