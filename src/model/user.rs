use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Id, Note, Pet, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Number of child rows owned by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserCounts {
    pub notes: u64,
    pub statuses: u64,
    pub pets: u64,
}

/// List projection of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithCounts {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "_count")]
    pub counts: UserCounts,
}

/// A user together with everything they own that the profile page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    pub notes: Vec<Note>,
    pub statuses: Vec<Status>,
    pub pets: Vec<Pet>,
    #[serde(rename = "_count")]
    pub counts: UserCounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of the username.
    pub search: Option<String>,
}
