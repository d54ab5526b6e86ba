//! # ClassWatch Store
//!
//! The tracking request data model and its durable store. Requests are
//! persisted as one JSON document (`{"requests": [...]}`), read in
//! full and written in full on every mutation, with a single-writer
//! lock so a command-layer removal cannot clobber a scheduler
//! timestamp update.

pub mod request;
pub mod store;

pub use request::{CachedMetadata, RequestKind, TrackingRequest, validate_term};
pub use store::{RequestStore, RequestUpdate};
