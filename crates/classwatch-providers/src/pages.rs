//! Page-scraping fallback provider.
//!
//! Course-id lookups hit the public class-list page and pull an
//! "`N of M`" occupancy token out of its text. No token is a valid
//! "unknown" result — the page renders without results for an invalid
//! id or an off-term course — and only transport failures are errors.

use std::sync::LazyLock;

use regex::Regex;

use classwatch_core::error::{Result, WatchError};
use classwatch_core::types::AvailabilityResult;

static OCCUPANCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) of (\d+)").expect("occupancy regex"));

pub struct PageClient {
    client: reqwest::Client,
    list_url: String,
}

impl PageClient {
    pub fn new(list_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            list_url: list_url.to_string(),
        }
    }

    /// Fetch the class-list page for one course id and scrape its
    /// occupancy.
    pub async fn course_availability(
        &self,
        course_id: &str,
        term: &str,
    ) -> Result<AvailabilityResult> {
        let response = self
            .client
            .get(&self.list_url)
            .query(&[
                ("campusOrOnlineSelection", "A"),
                ("honors", "F"),
                ("keywords", course_id),
                ("promod", "F"),
                ("searchType", "all"),
                ("term", term),
            ])
            .timeout(std::time::Duration::from_secs(20))
            .send()
            .await
            .map_err(|e| WatchError::Lookup(format!("Class list request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Lookup(format!("Class list error {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| WatchError::Lookup(format!("Class list body unreadable: {e}")))?;

        Ok(parse_occupancy(&text, course_id))
    }
}

/// Scrape `enrolled of capacity` out of free text. The title is the
/// first non-empty line when a token matched, `Course <id>` otherwise.
pub(crate) fn parse_occupancy(text: &str, course_id: &str) -> AvailabilityResult {
    let fallback_title = format!("Course {course_id}");

    let Some(caps) = OCCUPANCY_RE.captures(text) else {
        return AvailabilityResult {
            title: fallback_title,
            ..Default::default()
        };
    };

    // Both capture groups are \d+, so the parses cannot fail.
    let enrolled: u32 = caps[1].parse().unwrap_or(0);
    let capacity: u32 = caps[2].parse().unwrap_or(0);

    let title = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or(fallback_title);

    AvailabilityResult {
        enrolled: Some(enrolled),
        capacity: Some(capacity),
        title,
        ..Default::default()
    }
}
