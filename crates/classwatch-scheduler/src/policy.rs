//! Notification dedupe policy — the single decision point between
//! "seats are open" and "ping the user".

use std::collections::HashSet;
use std::sync::Mutex;

use classwatch_core::types::AvailabilityResult;
use classwatch_store::TrackingRequest;

/// Outcome of a dedupe decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyDecision {
    /// Open, and the user should hear about it this tick.
    NotifyNow,
    /// Open, but this policy already covered it.
    AlreadyNotified,
    /// Closed or occupancy unknown.
    NotAvailable,
}

/// Pluggable dedupe rule. The scheduler consults `decide` on every
/// successful check and reports delivered notifications back through
/// `mark_sent`, so a failed send is retried on a later tick.
pub trait NotifyPolicy: Send + Sync {
    fn decide(&self, request: &TrackingRequest, result: &AvailabilityResult) -> NotifyDecision;

    /// Called after a notification was actually delivered.
    fn mark_sent(&self, _request_id: &str) {}
}

/// Notify on every tick while seats remain open — the historical
/// behavior. A class that stays open pings its watcher once per tick.
pub struct RepeatPolicy;

impl NotifyPolicy for RepeatPolicy {
    fn decide(&self, _request: &TrackingRequest, result: &AvailabilityResult) -> NotifyDecision {
        if result.is_open() {
            NotifyDecision::NotifyNow
        } else {
            NotifyDecision::NotAvailable
        }
    }
}

/// Edge-triggered variant: notify only on a closed-to-open transition.
/// Tracks which requests were already notified while open; a close
/// resets the edge, so the next opening notifies again.
#[derive(Default)]
pub struct EdgePolicy {
    notified_open: Mutex<HashSet<String>>,
}

impl EdgePolicy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotifyPolicy for EdgePolicy {
    fn decide(&self, request: &TrackingRequest, result: &AvailabilityResult) -> NotifyDecision {
        let mut notified = self.notified_open.lock().expect("policy lock poisoned");
        if !result.is_open() {
            notified.remove(&request.id);
            return NotifyDecision::NotAvailable;
        }
        if notified.contains(&request.id) {
            NotifyDecision::AlreadyNotified
        } else {
            NotifyDecision::NotifyNow
        }
    }

    fn mark_sent(&self, request_id: &str) {
        self.notified_open
            .lock()
            .expect("policy lock poisoned")
            .insert(request_id.to_string());
    }
}
