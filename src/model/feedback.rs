use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{Id, UserSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    FeatureRequest,
    BugReport,
    General,
}

impl FeedbackType {
    pub const ALL: [FeedbackType; 3] = [
        FeedbackType::FeatureRequest,
        FeedbackType::BugReport,
        FeedbackType::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::FeatureRequest => "feature_request",
            FeedbackType::BugReport => "bug_report",
            FeedbackType::General => "general",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown feedback type '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Id,
    pub user_id: Id,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub message: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub user_id: Id,
    pub kind: FeedbackType,
    pub message: String,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedbackFilter {
    pub kind: Option<FeedbackType>,
    pub user_id: Option<Id>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_round_trips_through_str() {
        for kind in FeedbackType::ALL {
            assert_eq!(kind.as_str().parse::<FeedbackType>(), Ok(kind));
        }
        assert!("praise".parse::<FeedbackType>().is_err());
    }

    #[test]
    fn test_feedback_type_serializes_snake_case() {
        let json = serde_json::to_value(FeedbackType::FeatureRequest).unwrap();
        assert_eq!(json, serde_json::json!("feature_request"));
    }
}
