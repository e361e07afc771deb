//! Coordinator metrics
//!
//! Prometheus-compatible counters for the admission and routing paths,
//! exposed through the `/metrics` endpoint.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics registry
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);

#[derive(Debug, Default)]
pub struct Metrics {
    /// Write operations received
    pub puts_total: AtomicU64,
    /// Read operations received
    pub gets_total: AtomicU64,
    /// Mode switches applied
    pub mode_switches_total: AtomicU64,
    /// Tickets currently enqueued or in flight
    pub tickets_pending: AtomicU64,
    /// Transport faults swallowed by the router
    pub transport_errors_total: AtomicU64,
    /// Reads that produced no value (miss, wrong shard, or fault)
    pub read_misses_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(counter: &AtomicU64) {
        counter.fetch_sub(1, Ordering::Relaxed);
    }

    /// Render all counters in Prometheus text exposition format
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();
        let counters = [
            ("trikv_puts_total", &self.puts_total),
            ("trikv_gets_total", &self.gets_total),
            ("trikv_mode_switches_total", &self.mode_switches_total),
            ("trikv_tickets_pending", &self.tickets_pending),
            ("trikv_transport_errors_total", &self.transport_errors_total),
            ("trikv_read_misses_total", &self.read_misses_total),
        ];
        for (name, counter) in counters {
            out += &format!("{} {}\n", name, counter.load(Ordering::Relaxed));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let m = Metrics::new();
        Metrics::inc(&m.puts_total);
        Metrics::inc(&m.puts_total);
        Metrics::inc(&m.tickets_pending);
        Metrics::dec(&m.tickets_pending);
        assert_eq!(m.puts_total.load(Ordering::Relaxed), 2);
        assert_eq!(m.tickets_pending.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_prometheus_output() {
        let m = Metrics::new();
        Metrics::inc(&m.gets_total);
        let out = m.to_prometheus();
        assert!(out.contains("trikv_gets_total 1"));
        assert!(out.contains("trikv_puts_total 0"));
    }
}
