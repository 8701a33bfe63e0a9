use serde_json::Value;

use crate::model::{FeedbackFilter, FeedbackType, ListQuery, NewFeedback};
use crate::schema::rules::{
    as_object, optional_int, page_request, query_enum, query_id, required_enum, required_id,
    required_text, IntRule, TextRule,
};
use crate::schema::{QueryParams, Violations};

const FEEDBACK_TYPES: [&str; 3] = ["feature_request", "bug_report", "general"];
const USER_ID_POSITIVE: &str = "User ID must be a positive number";

/// `POST /feedback` body: `{ userId, type, message, rating? }`
pub fn parse_create_feedback(body: &Value) -> Result<NewFeedback, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let user_id = required_id(body, "userId", USER_ID_POSITIVE, &mut violations);
    let kind = required_enum::<FeedbackType>(body, "type", &FEEDBACK_TYPES, &mut violations);
    let message = required_text(
        body,
        "message",
        &TextRule::new()
            .min(10, "Message must be at least 10 characters long")
            .max(1000, "Message must not exceed 1000 characters"),
        &mut violations,
    );
    let rating = optional_int(
        body,
        "rating",
        &IntRule::new()
            .min(1, "Rating must be between 1 and 5")
            .max(5, "Rating must be between 1 and 5"),
        &mut violations,
    )
    .and_then(|rating| i32::try_from(rating).ok());

    match (user_id, kind, message) {
        (Some(user_id), Some(kind), Some(message)) => violations.into_result(NewFeedback {
            user_id,
            kind,
            message,
            rating,
        }),
        _ => Err(violations),
    }
}

/// `GET /feedback?page&limit&type&userId`
pub fn parse_list_feedback(query: &QueryParams) -> Result<ListQuery<FeedbackFilter>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let kind = query_enum::<FeedbackType>(query, "type", &FEEDBACK_TYPES, &mut violations);
    let user_id = query_id(query, "userId", USER_ID_POSITIVE, &mut violations);
    violations.into_result(ListQuery {
        page,
        filter: FeedbackFilter { kind, user_id },
    })
}
