//! # ClassWatch Scheduler
//!
//! The recurring background loop. On each tick it walks every stored
//! watch in insertion order, checks it against the availability
//! provider with a courtesy delay between checks, stamps bookkeeping
//! timestamps, and fires a notification when the dedupe policy says
//! an open-seat result should reach the user.
//!
//! ```text
//! tick (tokio interval)
//!   └── for each TrackingRequest (sequential)
//!         ├── RequestKind::check(provider)
//!         ├── store.update_checked(id)        (unconditional)
//!         ├── NotifyPolicy::decide(req, result)
//!         └── NotifyNow → sink.send → store.update_notified(id)
//! ```

pub mod engine;
pub mod message;
pub mod policy;

pub use engine::{TickSummary, WatchScheduler};
pub use message::open_seat_message;
pub use policy::{EdgePolicy, NotifyDecision, NotifyPolicy, RepeatPolicy};
