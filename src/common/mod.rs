//! Common utilities and types shared across trikv

pub mod config;
pub mod error;
pub mod metrics;

pub use config::{Config, CoordinatorConfig};
pub use error::{Error, Result};
pub use metrics::{Metrics, METRICS};
