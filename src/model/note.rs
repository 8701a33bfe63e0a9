use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Id, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Id,
    pub content: String,
    pub user_id: Id,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub content: String,
    pub user_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteChanges {
    pub content: Option<String>,
}

impl NoteChanges {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteFilter {
    pub user_id: Option<Id>,
    /// Case-insensitive substring of the content.
    pub search: Option<String>,
}
