//! Configuration for the trikv coordinator

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Coordinator config
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Base URLs of the three backing data centers, in partition order
    #[serde(default = "default_data_centers")]
    pub data_centers: [String; 3],
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

fn default_data_centers() -> [String; 3] {
    [
        "http://localhost:9001".to_string(),
        "http://localhost:9002".to_string(),
        "http://localhost:9003".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_centers: default_data_centers(),
        }
    }
}

impl Config {
    /// Load configuration from `trikv.toml` (if present) and `TRIKV_*`
    /// environment variables. Missing sources fall back to defaults.
    pub fn load() -> Self {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("trikv").required(false))
            .add_source(config::Environment::with_prefix("TRIKV").separator("__"));

        match builder.build().and_then(|c| c.try_deserialize()) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to load config file, using defaults: {}", e);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.coordinator.bind_addr.port(), 8080);
        assert_eq!(cfg.coordinator.data_centers.len(), 3);
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: Config = serde_json::from_str(
            r#"{ "coordinator": { "bind_addr": "127.0.0.1:9090" }, "log_level": "debug" }"#,
        )
        .unwrap();
        assert_eq!(cfg.coordinator.bind_addr.port(), 9090);
        assert_eq!(cfg.log_level, "debug");
        // Unspecified fields keep their defaults
        assert_eq!(cfg.coordinator.data_centers[0], "http://localhost:9001");
    }
}
