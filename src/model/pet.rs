use serde::{Deserialize, Serialize};

use crate::model::{Id, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Id,
    pub pet_name: String,
    pub rarity: String,
    pub owner_id: Id,
    pub owner: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub pet_name: String,
    pub rarity: String,
    pub owner_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PetChanges {
    pub pet_name: Option<String>,
    pub rarity: Option<String>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.pet_name.is_none() && self.rarity.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PetFilter {
    pub owner_id: Option<Id>,
    /// Exact rarity match.
    pub rarity: Option<String>,
    /// Case-insensitive substring of the pet name.
    pub search: Option<String>,
}
