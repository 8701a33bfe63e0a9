use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Id, Patch, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Id,
    pub user_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub user_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Patch<DateTime<Utc>>,
    pub location: Patch<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_unset()
            && self.start_date.is_none()
            && self.end_date.is_unset()
            && self.location.is_unset()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventFilter {
    pub user_id: Option<Id>,
    /// Only events whose start is at or after this instant.
    pub starts_at_or_after: Option<DateTime<Utc>>,
}

/// Whether an event window is well ordered: no end, or end not before start.
pub fn is_chronological(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> bool {
    end.map_or(true, |end| end >= start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_is_chronological() {
        let start = Utc::now();
        assert!(is_chronological(start, None));
        assert!(is_chronological(start, Some(start)));
        assert!(is_chronological(start, Some(start + Duration::hours(1))));
        assert!(!is_chronological(start, Some(start - Duration::seconds(1))));
    }
}
