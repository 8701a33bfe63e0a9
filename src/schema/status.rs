use serde_json::Value;

use crate::model::{ListQuery, NewStatus, StatusChanges, StatusFilter};
use crate::schema::rules::{
    as_object, nullable_text, optional_text, page_request, query_id, required_id,
    required_text, TextRule,
};
use crate::schema::{QueryParams, Violations};

const USER_ID_POSITIVE: &str = "User ID must be a positive integer";

fn description_rule() -> TextRule {
    TextRule::new()
        .min(1, "Description cannot be empty")
        .max(500, "Description must not exceed 500 characters")
}

fn image_url_rule() -> TextRule {
    TextRule::new().url("Image URL must be a valid URL")
}

/// `POST /status` body: `{ userId, description, imageUrl? }`
pub fn parse_create_status(body: &Value) -> Result<NewStatus, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let user_id = required_id(body, "userId", USER_ID_POSITIVE, &mut violations);
    let description = required_text(body, "description", &description_rule(), &mut violations);
    let image_url = optional_text(body, "imageUrl", &image_url_rule(), &mut violations);

    match (user_id, description) {
        (Some(user_id), Some(description)) => violations.into_result(NewStatus {
            user_id,
            description,
            image_url,
        }),
        _ => Err(violations),
    }
}

/// `PUT /status/{id}`: `description` may be omitted; `imageUrl` may also be
/// `null`, which removes the image.
pub fn parse_update_status(body: &Value) -> Result<StatusChanges, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let description = optional_text(body, "description", &description_rule(), &mut violations);
    let image_url = nullable_text(body, "imageUrl", &image_url_rule(), &mut violations);
    violations.into_result(StatusChanges {
        description,
        image_url,
    })
}

/// `GET /status?page&limit&userId`
pub fn parse_list_statuses(query: &QueryParams) -> Result<ListQuery<StatusFilter>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let user_id = query_id(query, "userId", USER_ID_POSITIVE, &mut violations);
    violations.into_result(ListQuery {
        page,
        filter: StatusFilter { user_id },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Patch;
    use serde_json::json;

    #[test]
    fn test_create_status_with_image() {
        let status = parse_create_status(&json!({
            "userId": 3,
            "description": "Playing today",
            "imageUrl": "https://cdn.example.com/a.png"
        }))
        .unwrap();
        assert_eq!(status.user_id, 3);
        assert_eq!(status.image_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_invalid_image_url() {
        let err = parse_create_status(&json!({
            "userId": 3,
            "description": "Playing today",
            "imageUrl": "not a url"
        }))
        .unwrap_err();
        assert_eq!(
            err.get("imageUrl").unwrap().messages,
            vec!["Image URL must be a valid URL"]
        );
    }

    #[test]
    fn test_update_distinguishes_absent_and_null_image() {
        let cleared = parse_update_status(&json!({ "imageUrl": null })).unwrap();
        assert_eq!(cleared.image_url, Patch::Null);
        assert_eq!(cleared.description, None);

        let untouched = parse_update_status(&json!({ "description": "new" })).unwrap();
        assert_eq!(untouched.image_url, Patch::Unset);
        assert_eq!(untouched.description.as_deref(), Some("new"));
    }

    #[test]
    fn test_update_rejects_null_description() {
        let err = parse_update_status(&json!({ "description": null })).unwrap_err();
        assert!(err.get("description").is_some());
    }
}
