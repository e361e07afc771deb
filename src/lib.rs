//! # trikv
//!
//! A coordinator that fronts three independent key-value data centers and
//! exposes them as a single logical store, with:
//! - Per-key admission queues serializing same-key operations by arrival time
//! - Full parallelism across unrelated keys
//! - Runtime-switchable placement: full replication or hash sharding
//! - Fail-open routing (a dead data center never wedges the queue)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              Coordinator                 │
//! │  HTTP in → ticket → admission → router   │
//! └───────────┬──────────┬──────────┬────────┘
//!             │ HTTP     │ HTTP     │ HTTP
//!       ┌─────▼────┐ ┌───▼──────┐ ┌─▼────────┐
//!       │ DC 1     │ │ DC 2     │ │ DC 3     │
//!       └──────────┘ └──────────┘ └──────────┘
//! ```
//!
//! ## Usage
//!
//! ### Start the coordinator
//! ```bash
//! trikv-coord serve \
//!   --bind 0.0.0.0:8080 \
//!   --data-centers http://dc1:8080,http://dc2:8080,http://dc3:8080
//! ```
//!
//! ### Use the CLI
//! ```bash
//! trikv put my-key my-value --coordinator http://localhost:8080
//! trikv get my-key --loc 1
//! trikv set-mode sharding
//! trikv status
//! ```

pub mod common;
pub mod coordinator;

// Re-export commonly used types
pub use common::{Config, Error, Result};
pub use coordinator::Coordinator;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
