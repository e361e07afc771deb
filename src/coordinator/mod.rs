//! Coordinator implementation
//!
//! The coordinator is responsible for:
//! - Stamping inbound operations and queueing them per key
//! - Admitting same-key operations one at a time, in stamp order
//! - Routing each operation to the right data center(s) for the mode
//! - Serving the legacy HTTP protocol to clients

pub mod admission;
pub mod http;
pub mod mode;
pub mod router;
pub mod server;
pub mod shard;
pub mod transport;

pub use server::Coordinator;
