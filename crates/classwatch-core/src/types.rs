//! Shared value types for availability lookups and notification routing.

use serde::{Deserialize, Serialize};

/// Who gets notified and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub user_id: u64,
    pub username: String,
    /// Channel the watch was created in; notifications land there.
    pub channel_id: u64,
}

/// One section row from the structured catalog provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRow {
    pub title: String,
    pub instructor: String,
    pub days: String,
    pub time: String,
    pub location: String,
    pub enrolled: u32,
    pub capacity: u32,
    /// Catalog number of the course this section belongs to.
    pub catalog_num: String,
    /// Registration number of the section itself.
    pub class_nbr: String,
}

impl SectionRow {
    pub fn open_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }
}

/// Normalized outcome of one availability check.
///
/// `enrolled`/`capacity` are both `None` when the provider could not
/// determine occupancy (e.g. the occupancy token was absent from a
/// scraped page). That is a valid "not currently available" result,
/// not an error.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityResult {
    pub enrolled: Option<u32>,
    pub capacity: Option<u32>,
    pub title: String,
    pub instructor: Option<String>,
    pub days: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
}

impl AvailabilityResult {
    /// `capacity - enrolled` when both are known.
    pub fn open_seats(&self) -> Option<u32> {
        match (self.enrolled, self.capacity) {
            (Some(e), Some(c)) => Some(c.saturating_sub(e)),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_seats().is_some_and(|n| n > 0)
    }
}

impl From<&SectionRow> for AvailabilityResult {
    fn from(row: &SectionRow) -> Self {
        Self {
            enrolled: Some(row.enrolled),
            capacity: Some(row.capacity),
            title: row.title.clone(),
            instructor: Some(row.instructor.clone()),
            days: Some(row.days.clone()),
            time: Some(row.time.clone()),
            location: Some(row.location.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_seats_needs_both_counts() {
        let mut r = AvailabilityResult {
            enrolled: Some(28),
            capacity: Some(30),
            ..Default::default()
        };
        assert_eq!(r.open_seats(), Some(2));
        assert!(r.is_open());

        r.capacity = None;
        assert_eq!(r.open_seats(), None);
        assert!(!r.is_open());
    }

    #[test]
    fn full_section_is_not_open() {
        let r = AvailabilityResult {
            enrolled: Some(30),
            capacity: Some(30),
            ..Default::default()
        };
        assert_eq!(r.open_seats(), Some(0));
        assert!(!r.is_open());
    }

    #[test]
    fn overenrolled_saturates_to_zero() {
        let r = AvailabilityResult {
            enrolled: Some(32),
            capacity: Some(30),
            ..Default::default()
        };
        assert_eq!(r.open_seats(), Some(0));
    }
}
