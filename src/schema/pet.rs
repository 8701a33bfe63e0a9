use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::{ListQuery, NewPet, PetChanges, PetFilter};
use crate::schema::rules::{
    as_object, optional_text, page_request, query_id, query_search, query_text, required_id,
    required_text, TextRule,
};
use crate::schema::{QueryParams, Violations};

static PET_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s_-]+$").expect("valid regex"));

fn pet_name_rule() -> TextRule {
    TextRule::new()
        .min(1, "Pet name cannot be empty")
        .max(50, "Pet name must not exceed 50 characters")
        .pattern(
            &PET_NAME,
            "Pet name can only contain letters, numbers, spaces, underscores, and hyphens",
        )
}

fn rarity_rule() -> TextRule {
    TextRule::new()
        .min(1, "Rarity cannot be empty")
        .max(50, "Rarity must not exceed 50 characters")
}

/// `POST /pet` body: `{ petName, rarity, ownerId }`
pub fn parse_create_pet(body: &Value) -> Result<NewPet, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let pet_name = required_text(body, "petName", &pet_name_rule(), &mut violations);
    let rarity = required_text(body, "rarity", &rarity_rule(), &mut violations);
    let owner_id = required_id(
        body,
        "ownerId",
        "Owner ID must be a positive integer",
        &mut violations,
    );

    match (pet_name, rarity, owner_id) {
        (Some(pet_name), Some(rarity), Some(owner_id)) => violations.into_result(NewPet {
            pet_name,
            rarity,
            owner_id,
        }),
        _ => Err(violations),
    }
}

/// `PUT /pet/{id}`: both fields optional, neither nullable.
pub fn parse_update_pet(body: &Value) -> Result<PetChanges, Violations> {
    let mut violations = Violations::new();
    let Some(body) = as_object(body, &mut violations) else {
        return Err(violations);
    };
    let pet_name = optional_text(body, "petName", &pet_name_rule(), &mut violations);
    let rarity = optional_text(body, "rarity", &rarity_rule(), &mut violations);
    violations.into_result(PetChanges { pet_name, rarity })
}

/// `GET /pet?page&limit&ownerId&rarity&search`
pub fn parse_list_pets(query: &QueryParams) -> Result<ListQuery<PetFilter>, Violations> {
    let mut violations = Violations::new();
    let page = page_request(query, &mut violations);
    let owner_id = query_id(
        query,
        "ownerId",
        "Owner ID must be a positive integer",
        &mut violations,
    );
    let rarity = query_text(query, "rarity", &rarity_rule(), &mut violations);
    let search = query_search(
        query,
        50,
        "Search term must not exceed 50 characters",
        &mut violations,
    );
    violations.into_result(ListQuery {
        page,
        filter: PetFilter {
            owner_id,
            rarity,
            search,
        },
    })
}
