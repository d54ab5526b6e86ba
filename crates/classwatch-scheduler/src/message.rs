//! Notification message formatting.

use classwatch_core::types::AvailabilityResult;
use classwatch_store::{RequestKind, TrackingRequest};

/// Build the open-seat alert for one request.
pub fn open_seat_message(request: &TrackingRequest, result: &AvailabilityResult) -> String {
    let seats = result.open_seats().unwrap_or(0);
    let title = if result.title.is_empty() {
        request.title().unwrap_or("Unknown").to_string()
    } else {
        result.title.clone()
    };

    match &request.kind {
        RequestKind::Class { .. } => {
            let instructor = result.instructor.as_deref().unwrap_or("TBA");
            format!(
                "🎉 **SPOT AVAILABLE!**\n\n\
                 **{}** - {title}\n\
                 👨‍🏫 {instructor}\n\
                 🪑 **{seats} seat(s) available!**\n\n\
                 ⚡ Enroll now before it fills up!",
                request.kind.describe()
            )
        }
        RequestKind::Course { .. } => format!(
            "🎉 **SPOT AVAILABLE!**\n\n\
             **{}** - {title}\n\
             🪑 **{seats} seat(s) available!**\n\n\
             ⚡ Enroll now before it fills up!",
            request.kind.describe()
        ),
    }
}
