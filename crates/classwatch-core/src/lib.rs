//! # ClassWatch Core
//!
//! Shared foundation for the ClassWatch workspace: the error taxonomy,
//! TOML configuration, availability value types, and the capability
//! traits (`AvailabilityProvider`, `NotificationSink`) that the
//! scheduler consumes without knowing provider or channel details.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::WatchConfig;
pub use error::{Result, WatchError};
pub use traits::{AvailabilityProvider, NotificationSink};
pub use types::{AvailabilityResult, Owner, SectionRow};
