use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::PetOperations;
use crate::model::{Paginated, Pet};
use crate::schema::pet::{parse_create_pet, parse_list_pets, parse_update_pet};
use crate::schema::parse_id;
use crate::store::traits::Store;

pub async fn create_pet<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Pet>, ApiError> {
    let new_pet = parse_create_pet(&body)?;
    let pet = PetOperations::create(state.store.as_ref(), new_pet).await?;
    log::info!("Created pet {}", pet.id);
    Ok(ApiResponse::created(pet, "Pet created successfully"))
}

pub async fn list_pets<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<Pet>>, ApiError> {
    let query = parse_list_pets(&query)?;
    let page = PetOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Pets retrieved successfully"))
}

pub async fn get_pet<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Pet>, ApiError> {
    let id = parse_id(&id)?;
    let pet = PetOperations::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(pet, "Pet retrieved successfully"))
}

pub async fn update_pet<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Pet>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_update_pet(&body)?;
    let pet = PetOperations::update(state.store.as_ref(), id, changes).await?;
    Ok(ApiResponse::ok(pet, "Pet updated successfully"))
}

pub async fn delete_pet<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = PetOperations::delete(state.store.as_ref(), id).await?;
    log::info!("Deleted pet {}: {:?}", id, deleted);
    Ok(ApiResponse::empty("Pet deleted successfully"))
}
