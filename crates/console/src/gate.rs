//! Last-write-wins request gating.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::AbortHandle;

/// Sequence number handed to a request when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// What happened to a gated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written to view state.
    Applied,
    /// The request failed; view state was left as it was.
    Failed(String),
    /// A newer request started first; the response was discarded.
    Stale,
}

/// Hands out monotonically increasing tickets and remembers the task serving
/// the newest one.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Record the task serving the newest ticket and abort the one it replaces.
    pub fn track(&self, handle: AbortHandle) {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(handle) {
            if !previous.is_finished() {
                tracing::debug!("aborting superseded request");
                previous.abort();
            }
        }
    }

    /// Invalidate outstanding tickets and abort the in-flight task, e.g. when
    /// the view is closed.
    pub fn cancel(&self) {
        self.issue();
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let gate = RequestGate::new();
        let a = gate.issue();
        assert!(gate.is_current(a));
        let b = gate.issue();
        assert!(!gate.is_current(a));
        assert!(gate.is_current(b));
        assert!(b > a);
    }

    #[test]
    fn cancel_invalidates_everything() {
        let gate = RequestGate::new();
        let a = gate.issue();
        gate.cancel();
        assert!(!gate.is_current(a));
    }

    #[tokio::test]
    async fn tracking_a_new_task_aborts_the_old_one() {
        let gate = RequestGate::new();
        let slow = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        gate.track(slow.abort_handle());
        let quick = tokio::spawn(async {});
        gate.track(quick.abort_handle());

        assert!(slow.await.unwrap_err().is_cancelled());
        quick.await.unwrap();
    }
}
