//! Mode-aware routing to the data centers
//!
//! Decides which subset of the three nodes a write or read touches, based on
//! the placement mode read fresh on every call. Transport faults are logged
//! and swallowed so a dead node never leaves a ticket stuck in flight:
//! writes complete regardless, reads degrade to "no value".

use crate::common::{Metrics, METRICS};
use crate::coordinator::mode::{Mode, ModeState};
use crate::coordinator::shard::{shard_for_key, Shard};
use crate::coordinator::transport::DataCenterTransport;
use std::sync::Arc;

pub struct Router {
    transport: Arc<dyn DataCenterTransport>,
    /// Base URLs of the three data centers, indexed by shard
    endpoints: [String; 3],
    mode: ModeState,
}

impl Router {
    pub fn new(transport: Arc<dyn DataCenterTransport>, endpoints: [String; 3]) -> Self {
        Self {
            transport,
            endpoints,
            mode: ModeState::new(),
        }
    }

    /// Current placement mode.
    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    /// Switch placement mode. Takes effect for operations admitted after the
    /// switch; operations already routing are not drained or redirected.
    pub fn set_mode(&self, mode: Mode) {
        self.mode.set(mode);
        Metrics::inc(&METRICS.mode_switches_total);
        tracing::info!(%mode, "placement mode switched");
    }

    fn endpoint(&self, shard: Shard) -> &str {
        &self.endpoints[shard.index()]
    }

    /// Write a value under the current mode.
    ///
    /// Replication writes all three nodes independently with no atomicity
    /// across them; a partial failure leaves the centers divergent and is
    /// not rolled back. Sharding writes only the key's own node.
    pub async fn write(&self, key: &str, value: &str) {
        match self.mode.get() {
            Mode::Replication => {
                for shard in [Shard::One, Shard::Two, Shard::Three] {
                    self.put_one(shard, key, value).await;
                }
            }
            Mode::Sharding => {
                self.put_one(shard_for_key(key), key, value).await;
            }
        }
    }

    async fn put_one(&self, shard: Shard, key: &str, value: &str) {
        let endpoint = self.endpoint(shard);
        if let Err(e) = self.transport.put(endpoint, key, value).await {
            Metrics::inc(&METRICS.transport_errors_total);
            tracing::warn!(key, %shard, error = %e, "put failed, continuing");
        }
    }

    /// Read a value under the current mode.
    ///
    /// Replication always reads node 1, ignoring `requested`. Sharding only
    /// reads when `requested` matches the key's shard; otherwise no network
    /// call is made. `None` means no value was obtained, whether from a
    /// miss, a shard mismatch, or a transport fault.
    pub async fn read(&self, key: &str, requested: Shard) -> Option<String> {
        let shard = match self.mode.get() {
            Mode::Replication => Shard::One,
            Mode::Sharding => {
                let owner = shard_for_key(key);
                if requested != owner {
                    Metrics::inc(&METRICS.read_misses_total);
                    return None;
                }
                owner
            }
        };

        let endpoint = self.endpoint(shard);
        match self.transport.get(endpoint, key).await {
            Ok(value) => Some(value),
            Err(e) => {
                Metrics::inc(&METRICS.transport_errors_total);
                Metrics::inc(&METRICS.read_misses_total);
                tracing::warn!(key, %shard, error = %e, "get failed");
                None
            }
        }
    }
}
