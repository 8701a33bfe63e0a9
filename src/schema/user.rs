use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::{ListQuery, NewUser, UserFilter};
use crate::schema::rules::{as_object, page_request, query_search, required_text, TextRule};
use crate::schema::{QueryParams, Violations};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;

static USERNAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

fn username_rule() -> TextRule {
    TextRule::new()
        .min(USERNAME_MIN, "Username must be at least 3 characters")
        .max(USERNAME_MAX, "Username must not exceed 50 characters")
        .pattern(
            &USERNAME,
            "Username can only contain letters, numbers, underscores, and hyphens",
        )
}

/// `GET /user?page&limit&search`
pub fn parse_list_users(query: &QueryParams) -> Result<ListQuery<UserFilter>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let search = query_search(
        query,
        50,
        "Search term must not exceed 50 characters",
        &mut violations,
    );
    violations.into_result(ListQuery {
        page,
        filter: UserFilter { search },
    })
}

/// `PUT /user` body: `{ "username": string }`
pub fn parse_update_or_create_user(body: &Value) -> Result<NewUser, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let username = required_text(body, "username", &username_rule(), &mut violations);
    match username {
        Some(username) => violations.into_result(NewUser { username }),
        None => Err(violations),
    }
}
