//! Per-key ordered admission
//!
//! Every inbound operation takes a ticket stamped with its arrival time. For
//! a given key, tickets are admitted one at a time in stamp order; tickets
//! for different keys never wait on each other. Release wakes every waiter
//! and each one re-checks its own admission condition, so a wake-up never
//! implies readiness. The data-center I/O itself runs outside the queue
//! lock, which only covers bookkeeping.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// What a ticket intends to do once admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Read,
    Write,
}

/// Identity of a queued operation.
///
/// Ordered by wall-clock arrival time, with a process-wide monotonic
/// sequence number breaking ties between operations stamped in the same
/// millisecond. Two tickets never compare equal, so colliding stamps queue
/// behind each other in arrival order instead of overwriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket {
    pub timestamp_ms: i64,
    pub seq: u64,
}

#[derive(Debug, Default)]
struct QueueState {
    /// key -> tickets awaiting or holding admission, sorted by arrival
    queues: HashMap<String, BTreeMap<Ticket, OpKind>>,
    /// key -> kind of the operation currently being serviced
    in_flight: HashMap<String, OpKind>,
}

/// Per-key FIFO-by-timestamp admission control.
#[derive(Debug)]
pub struct AdmissionQueue {
    state: Mutex<QueueState>,
    /// Broadcast condition: signalled on every release
    released: Notify,
    next_seq: AtomicU64,
}

impl AdmissionQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            released: Notify::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert a ticket stamped with the current wall-clock time. Never
    /// blocks; the returned ticket is handed to `acquire`/`release`.
    pub fn enqueue(&self, key: &str, kind: OpKind) -> Ticket {
        self.enqueue_at(key, Utc::now().timestamp_millis(), kind)
    }

    /// Insert a ticket with an explicit timestamp.
    pub fn enqueue_at(&self, key: &str, timestamp_ms: i64, kind: OpKind) -> Ticket {
        let ticket = Ticket {
            timestamp_ms,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        let mut state = self.state.lock().unwrap();
        state
            .queues
            .entry(key.to_string())
            .or_default()
            .insert(ticket, kind);
        ticket
    }

    /// Suspend until `ticket` is the oldest entry for `key` and no other
    /// operation on `key` is in flight, then mark the key in flight.
    ///
    /// There is no timeout and no cancellation: a ticket that was enqueued
    /// is expected to wait for its turn, however long that takes.
    pub async fn acquire(&self, key: &str, ticket: Ticket) {
        loop {
            // Register for the next release before checking, so a release
            // racing with the check cannot be missed.
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.try_admit(key, ticket) {
                return;
            }
            notified.await;
        }
    }

    fn try_admit(&self, key: &str, ticket: Ticket) -> bool {
        let mut state = self.state.lock().unwrap();
        let head = match state.queues.get(key).and_then(|q| q.first_key_value()) {
            Some((head, kind)) => (*head, *kind),
            None => return false,
        };
        if head.0 == ticket && !state.in_flight.contains_key(key) {
            state.in_flight.insert(key.to_string(), head.1);
            tracing::debug!(key, seq = ticket.seq, "ticket admitted");
            return true;
        }
        false
    }

    /// Remove a completed ticket and wake all waiters. The wake is a
    /// broadcast across every key; each waiter re-validates its own
    /// condition and goes back to sleep if it still is not at the front.
    pub fn release(&self, key: &str, ticket: Ticket) {
        {
            let mut state = self.state.lock().unwrap();
            state.in_flight.remove(key);
            if let Some(queue) = state.queues.get_mut(key) {
                queue.remove(&ticket);
                if queue.is_empty() {
                    state.queues.remove(key);
                }
            }
        }
        tracing::debug!(key, seq = ticket.seq, "ticket released");
        self.released.notify_waiters();
    }

    /// Number of tickets queued or in flight for a key.
    pub fn depth(&self, key: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.queues.get(key).map(|q| q.len()).unwrap_or(0)
    }

    /// Whether some ticket for this key currently holds admission.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.state.lock().unwrap().in_flight.contains_key(key)
    }
}

impl Default for AdmissionQueue {
    fn default() -> Self {
        Self::new()
    }
}
