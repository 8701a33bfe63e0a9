use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Id, Patch, UserSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: Id,
    pub user_id: Id,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatus {
    pub user_id: Id,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusChanges {
    pub description: Option<String>,
    pub image_url: Patch<String>,
}

impl StatusChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.image_url.is_unset()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusFilter {
    pub user_id: Option<Id>,
}
