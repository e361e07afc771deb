//! Placement mode
//!
//! A single process-wide flag selecting between full replication and hash
//! sharding. Switches take effect immediately with no draining: operations
//! already past admission may finish under the old mode, which is accepted.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Placement strategy for reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Replication,
    Sharding,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Replication => "replication",
            Mode::Sharding => "sharding",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "replication" => Ok(Mode::Replication),
            "sharding" => Ok(Mode::Sharding),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free holder for the current mode.
///
/// Stored as a single atomic word so readers are never torn and never block.
/// Readers load the mode fresh on every operation rather than caching it.
#[derive(Debug)]
pub struct ModeState {
    current: AtomicU8,
}

const MODE_REPLICATION: u8 = 0;
const MODE_SHARDING: u8 = 1;

impl ModeState {
    pub fn new() -> Self {
        Self {
            current: AtomicU8::new(MODE_REPLICATION),
        }
    }

    pub fn get(&self) -> Mode {
        match self.current.load(Ordering::Acquire) {
            MODE_SHARDING => Mode::Sharding,
            _ => Mode::Replication,
        }
    }

    pub fn set(&self, mode: Mode) {
        let raw = match mode {
            Mode::Replication => MODE_REPLICATION,
            Mode::Sharding => MODE_SHARDING,
        };
        self.current.store(raw, Ordering::Release);
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new()
    }
}
