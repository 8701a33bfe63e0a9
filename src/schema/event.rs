use serde_json::Value;

use crate::model::{is_chronological, EventChanges, EventFilter, ListQuery, NewEvent, Patch};
use crate::schema::rules::{
    as_object, nullable_text, nullable_timestamp, optional_text, optional_timestamp,
    page_request, query_bool, query_id, required_id, required_text, required_timestamp,
    TextRule,
};
use crate::schema::{QueryParams, Violations};

pub const END_BEFORE_START: &str = "End date must not be before start date";
const START_DATE_FORMAT: &str = "Start date must be a valid ISO 8601 datetime";
const END_DATE_FORMAT: &str = "End date must be a valid ISO 8601 datetime";

fn title_rule() -> TextRule {
    TextRule::new()
        .min(1, "Title cannot be empty")
        .max(200, "Title must not exceed 200 characters")
}

fn description_rule() -> TextRule {
    TextRule::new().max(1000, "Description must not exceed 1000 characters")
}

fn location_rule() -> TextRule {
    TextRule::new().max(200, "Location must not exceed 200 characters")
}

/// `POST /event` body.
pub fn parse_create_event(body: &Value) -> Result<NewEvent, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let user_id = required_id(
        body,
        "userId",
        "User ID must be a positive integer",
        &mut violations,
    );
    let title = required_text(body, "title", &title_rule(), &mut violations);
    let description = nullable_text(body, "description", &description_rule(), &mut violations);
    let start_date = required_timestamp(body, "startDate", START_DATE_FORMAT, &mut violations);
    let end_date = nullable_timestamp(body, "endDate", END_DATE_FORMAT, &mut violations);
    let location = nullable_text(body, "location", &location_rule(), &mut violations);

    if let (Some(start), Patch::Value(end)) = (start_date, &end_date) {
        if !is_chronological(start, Some(*end)) {
            violations.add("endDate", END_BEFORE_START);
        }
    }

    match (user_id, title, start_date) {
        (Some(user_id), Some(title), Some(start_date)) => violations.into_result(NewEvent {
            user_id,
            title,
            description: description.apply(None),
            start_date,
            end_date: end_date.apply(None),
            location: location.apply(None),
        }),
        _ => Err(violations),
    }
}

/// `PUT /event/{id}`. `title` and `startDate` can be changed but not cleared;
/// `description`, `endDate` and `location` accept `null` to clear them.
///
/// Ordering between the dates is only checked here when both are supplied;
/// the update use-case re-checks against the stored row.
pub fn parse_update_event(body: &Value) -> Result<EventChanges, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let title = optional_text(body, "title", &title_rule(), &mut violations);
    let description = nullable_text(body, "description", &description_rule(), &mut violations);
    let start_date = optional_timestamp(body, "startDate", START_DATE_FORMAT, &mut violations);
    let end_date = nullable_timestamp(body, "endDate", END_DATE_FORMAT, &mut violations);
    let location = nullable_text(body, "location", &location_rule(), &mut violations);

    if let (Some(start), Patch::Value(end)) = (start_date, &end_date) {
        if !is_chronological(start, Some(*end)) {
            violations.add("endDate", END_BEFORE_START);
        }
    }

    violations.into_result(EventChanges {
        title,
        description,
        start_date,
        end_date,
        location,
    })
}

/// Parsed `GET /event` query. `upcoming` is resolved against the clock by
/// the list use-case, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventListParams {
    pub user_id: Option<crate::model::Id>,
    pub upcoming: bool,
}

/// `GET /event?page&limit&userId&upcoming`
pub fn parse_list_events(
    query: &QueryParams,
) -> Result<ListQuery<EventListParams>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let user_id = query_id(
        query,
        "userId",
        "User ID must be a positive integer",
        &mut violations,
    );
    let upcoming = query_bool(query, "upcoming").unwrap_or(false);
    violations.into_result(ListQuery {
        page,
        filter: EventListParams { user_id, upcoming },
    })
}

impl EventListParams {
    pub fn into_filter(self, now: chrono::DateTime<chrono::Utc>) -> EventFilter {
        EventFilter {
            user_id: self.user_id,
            starts_at_or_after: self.upcoming.then_some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_create_event_minimal() {
        let event = parse_create_event(&json!({
            "userId": 1,
            "title": "Team Meeting",
            "startDate": "2024-02-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(event.start_date, Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap());
        assert_eq!(event.end_date, None);
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_create_event_rejects_end_before_start() {
        let err = parse_create_event(&json!({
            "userId": 1,
            "title": "Raid",
            "startDate": "2024-02-01T10:00:00Z",
            "endDate": "2024-02-01T09:00:00Z"
        }))
        .unwrap_err();
        assert_eq!(err.get("endDate").unwrap().messages, vec![END_BEFORE_START]);
    }

    #[test]
    fn test_create_event_bad_dates() {
        let err = parse_create_event(&json!({
            "userId": 1,
            "title": "Raid",
            "startDate": "tomorrow"
        }))
        .unwrap_err();
        assert_eq!(
            err.get("startDate").unwrap().messages,
            vec!["Start date must be a valid ISO 8601 datetime"]
        );
    }

    #[test]
    fn test_update_event_tri_state() {
        let changes = parse_update_event(&json!({
            "location": null,
            "description": "Bring snacks"
        }))
        .unwrap();
        assert_eq!(changes.location, Patch::Null);
        assert_eq!(changes.description, Patch::Value("Bring snacks".to_string()));
        assert_eq!(changes.end_date, Patch::Unset);
        assert_eq!(changes.title, None);
    }

    #[test]
    fn test_update_event_rejects_null_title() {
        let err = parse_update_event(&json!({ "title": null })).unwrap_err();
        assert!(err.get("title").is_some());
    }

    #[test]
    fn test_list_events_upcoming() {
        let query: QueryParams = [("upcoming".to_string(), "true".to_string())].into();
        let parsed = parse_list_events(&query).unwrap();
        assert!(parsed.filter.upcoming);

        let now = Utc::now();
        let filter = parsed.filter.into_filter(now);
        assert_eq!(filter.starts_at_or_after, Some(now));

        let none = parse_list_events(&QueryParams::new()).unwrap();
        assert_eq!(none.filter.into_filter(now).starts_at_or_after, None);
    }

    #[test]
    fn test_list_events_upcoming_uses_truthiness() {
        for raw in ["false", "yes", "0"] {
            let query: QueryParams = [("upcoming".to_string(), raw.to_string())].into();
            assert!(parse_list_events(&query).unwrap().filter.upcoming, "{}", raw);
        }
        let empty: QueryParams = [("upcoming".to_string(), String::new())].into();
        assert!(!parse_list_events(&empty).unwrap().filter.upcoming);
    }

    #[test]
    fn test_create_event_rejects_numeric_offset() {
        let err = parse_create_event(&json!({
            "userId": 1,
            "title": "Raid",
            "startDate": "2024-02-01T12:00:00+02:00"
        }))
        .unwrap_err();
        assert_eq!(err.get("startDate").unwrap().messages, vec![START_DATE_FORMAT]);
    }
}
