//! The availability lookup adapter the scheduler consumes.

use async_trait::async_trait;

use classwatch_core::config::WatchConfig;
use classwatch_core::error::Result;
use classwatch_core::traits::AvailabilityProvider;
use classwatch_core::types::{AvailabilityResult, SectionRow};

use crate::catalog::CatalogClient;
use crate::pages::PageClient;

/// Normalizes both external sources behind one capability.
pub struct SeatLookup {
    catalog: CatalogClient,
    pages: PageClient,
}

impl SeatLookup {
    pub fn new(catalog: CatalogClient, pages: PageClient) -> Self {
        Self { catalog, pages }
    }

    pub fn from_config(config: &WatchConfig) -> Self {
        Self::new(
            CatalogClient::new(&config.catalog_api_url),
            PageClient::new(&config.class_list_url),
        )
    }

    /// Subject-wide catalog search, for the command surface
    /// (`/searchclass`). Not used by the scheduler.
    pub async fn search(
        &self,
        subject: &str,
        term: &str,
        catalog_num: Option<&str>,
    ) -> Result<Vec<SectionRow>> {
        self.catalog.search(subject, term, catalog_num).await
    }
}

#[async_trait]
impl AvailabilityProvider for SeatLookup {
    async fn lookup_by_course_id(
        &self,
        course_id: &str,
        term: &str,
    ) -> Result<AvailabilityResult> {
        self.pages.course_availability(course_id, term).await
    }

    async fn lookup_by_class_subject(
        &self,
        catalog_num: &str,
        subject: &str,
        term: &str,
    ) -> Result<Vec<SectionRow>> {
        self.catalog.sections(catalog_num, subject, term).await
    }
}
