use serde_json::Value;

use crate::model::{ListQuery, NewNote, NoteChanges, NoteFilter};
use crate::schema::rules::{
    as_object, page_request, query_id, query_search, required_id, required_text, TextRule,
};
use crate::schema::{QueryParams, Violations};

const USER_ID_POSITIVE: &str = "User ID must be a positive integer";

fn content_rule() -> TextRule {
    TextRule::new()
        .min(1, "Note content cannot be empty")
        .max(1000, "Note content must not exceed 1000 characters")
}

/// `POST /note` body: `{ content, userId }`
pub fn parse_create_note(body: &Value) -> Result<NewNote, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let content = required_text(body, "content", &content_rule(), &mut violations);
    let user_id = required_id(body, "userId", USER_ID_POSITIVE, &mut violations);

    match (content, user_id) {
        (Some(content), Some(user_id)) => violations.into_result(NewNote { content, user_id }),
        _ => Err(violations),
    }
}

/// `PUT /note/{id}` body: `{ content }`; content is the only editable field.
pub fn parse_update_note(body: &Value) -> Result<NoteChanges, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let content = required_text(body, "content", &content_rule(), &mut violations);
    match content {
        Some(content) => violations.into_result(NoteChanges {
            content: Some(content),
        }),
        None => Err(violations),
    }
}

/// `GET /note?page&limit&userId&search`
pub fn parse_list_notes(query: &QueryParams) -> Result<ListQuery<NoteFilter>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let user_id = query_id(query, "userId", USER_ID_POSITIVE, &mut violations);
    let search = query_search(
        query,
        100,
        "Search term must not exceed 100 characters",
        &mut violations,
    );
    violations.into_result(ListQuery {
        page,
        filter: NoteFilter { user_id, search },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_note() {
        let note = parse_create_note(&json!({ "content": "hello", "userId": 1 })).unwrap();
        assert_eq!(
            note,
            NewNote {
                content: "hello".to_string(),
                user_id: 1
            }
        );
    }

    #[test]
    fn test_create_note_reports_all_fields() {
        let err = parse_create_note(&json!({ "content": "", "userId": -4 })).unwrap_err();
        assert_eq!(
            err.get("content").unwrap().messages,
            vec!["Note content cannot be empty"]
        );
        assert_eq!(
            err.get("userId").unwrap().messages,
            vec!["User ID must be a positive integer"]
        );
    }

    #[test]
    fn test_content_length_limit() {
        assert!(parse_update_note(&json!({ "content": "x".repeat(1000) })).is_ok());
        assert!(parse_update_note(&json!({ "content": "x".repeat(1001) })).is_err());
    }

    #[test]
    fn test_list_notes_coerces_user_id() {
        let query: QueryParams = [
            ("userId".to_string(), "7".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
        .into();
        let parsed = parse_list_notes(&query).unwrap();
        assert_eq!(parsed.filter.user_id, Some(7));
        assert_eq!(parsed.page.page, 2);

        let bad: QueryParams = [("userId".to_string(), "seven".to_string())].into();
        let err = parse_list_notes(&bad).unwrap_err();
        assert_eq!(
            err.get("userId").unwrap().messages,
            vec!["Expected number, received nan"]
        );
    }
}
