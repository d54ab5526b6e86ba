//! Tracking request definitions — the unit of work being watched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classwatch_core::error::{Result, WatchError};
use classwatch_core::traits::AvailabilityProvider;
use classwatch_core::types::{AvailabilityResult, Owner};

/// A stored intent to be notified when a class or course opens up.
///
/// Serializes flat: the kind contributes a `"type"` tag plus its own
/// payload fields, cached metadata contributes optional display
/// fields. The on-disk shape is the historical one (`id`, `type`,
/// `user_id`, `username`, `channel_id`, `class_num`/`class_subject` or
/// `course_id`, `term`, timestamps, metadata).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRequest {
    /// Unique request ID, the sole key for update/delete.
    pub id: String,
    #[serde(flatten)]
    pub kind: RequestKind,
    pub user_id: u64,
    pub username: String,
    /// Channel where notifications should be sent.
    pub channel_id: u64,
    /// Academic term, 4 digits.
    pub term: String,
    pub added_at: DateTime<Utc>,
    /// Set on every scheduler pass that evaluates this request.
    pub last_checked: Option<DateTime<Utc>>,
    /// Set only when a notification was actually delivered.
    pub last_notified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: CachedMetadata,
}

/// Which external provider a request is checked against, plus its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequestKind {
    /// Structured catalog lookup by subject + catalog number.
    Class {
        class_num: String,
        class_subject: String,
    },
    /// Page-scrape lookup by a single course registration id.
    Course { course_id: String },
}

/// Denormalized display snapshot captured at creation or on a
/// successful check, so listings don't have to re-query the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RequestKind {
    /// Validated class lookup. Subject is normalized to uppercase.
    pub fn class(class_num: &str, class_subject: &str) -> Result<Self> {
        if !is_catalog_number(class_num) {
            return Err(WatchError::Validation(
                "Class number must be numeric (e.g., 205 or 112.5)".into(),
            ));
        }
        if class_subject.is_empty() || class_subject.len() > 6 {
            return Err(WatchError::Validation(
                "Subject must be a valid code (e.g., CSE, MAT, ENG)".into(),
            ));
        }
        Ok(Self::Class {
            class_num: class_num.to_string(),
            class_subject: class_subject.to_uppercase(),
        })
    }

    /// Validated course-id lookup.
    pub fn course(course_id: &str) -> Result<Self> {
        if course_id.is_empty() || !course_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WatchError::Validation(
                "Course ID must be numeric (e.g., 12345)".into(),
            ));
        }
        Ok(Self::Course {
            course_id: course_id.to_string(),
        })
    }

    /// Run the availability check this kind calls for.
    ///
    /// Class lookups take the first returned section as representative:
    /// a class with multiple sections is monitored via that one
    /// section's seat count. No sections means "not available".
    pub async fn check(
        &self,
        provider: &dyn AvailabilityProvider,
        term: &str,
    ) -> Result<AvailabilityResult> {
        match self {
            Self::Class {
                class_num,
                class_subject,
            } => {
                let rows = provider
                    .lookup_by_class_subject(class_num, class_subject, term)
                    .await?;
                Ok(rows
                    .first()
                    .map(AvailabilityResult::from)
                    .unwrap_or_default())
            }
            Self::Course { course_id } => provider.lookup_by_course_id(course_id, term).await,
        }
    }

    /// Short human identity, e.g. "CSE 205" or "Course 12345".
    pub fn describe(&self) -> String {
        match self {
            Self::Class {
                class_num,
                class_subject,
            } => format!("{class_subject} {class_num}"),
            Self::Course { course_id } => format!("Course {course_id}"),
        }
    }
}

impl TrackingRequest {
    /// Allocate a fresh request with a v4 id and creation timestamp.
    pub fn new(kind: RequestKind, owner: Owner, term: &str, metadata: CachedMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            user_id: owner.user_id,
            username: owner.username,
            channel_id: owner.channel_id,
            term: term.to_string(),
            added_at: Utc::now(),
            last_checked: None,
            last_notified: None,
            metadata,
        }
    }

    /// Best-known display title for this request.
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .class_title
            .as_deref()
            .or(self.metadata.course_title.as_deref())
    }
}

/// Term must be exactly 4 digits (e.g., 2261 for Spring 2026).
pub fn validate_term(term: &str) -> Result<()> {
    if term.len() != 4 || !term.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WatchError::Validation(
            "Term must be 4 digits (e.g., 2261 for Spring 2026)".into(),
        ));
    }
    Ok(())
}

/// Numeric, allowing one decimal point ("205", "112.5").
fn is_catalog_number(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let stripped = s.replacen('.', "", 1);
    !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
}
