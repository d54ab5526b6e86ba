//! Capability traits at the external seams.
//!
//! The scheduler only ever talks to these; the concrete catalog
//! client, page scraper, and Discord channel live behind them.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AvailabilityResult, SectionRow};

/// External availability data source.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Look up a single course by its registration id. All-`None`
    /// occupancy on a parse miss, `Err` only on transport failure.
    async fn lookup_by_course_id(&self, course_id: &str, term: &str)
    -> Result<AvailabilityResult>;

    /// Look up all sections for a subject + catalog number. Order is
    /// the provider's; callers treat the first row as representative.
    async fn lookup_by_class_subject(
        &self,
        catalog_num: &str,
        subject: &str,
        term: &str,
    ) -> Result<Vec<SectionRow>>;
}

/// Messaging channel the bot delivers availability alerts through.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `text` to `channel_id`, addressed at `user_id`.
    async fn send(&self, channel_id: u64, user_id: u64, text: &str) -> Result<()>;
}
