use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::NoteOperations;
use crate::model::{Paginated, Note};
use crate::schema::note::{parse_create_note, parse_list_notes, parse_update_note};
use crate::schema::parse_id;
use crate::store::traits::Store;

pub async fn create_note<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Note>, ApiError> {
    let new_note = parse_create_note(&body)?;
    let note = NoteOperations::create(state.store.as_ref(), new_note).await?;
    log::info!("Created note {}", note.id);
    Ok(ApiResponse::created(note, "Note created successfully"))
}

pub async fn list_notes<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<Note>>, ApiError> {
    let query = parse_list_notes(&query)?;
    let page = NoteOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Notes retrieved successfully"))
}

pub async fn get_note<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Note>, ApiError> {
    let id = parse_id(&id)?;
    let note = NoteOperations::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(note, "Note retrieved successfully"))
}

pub async fn update_note<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Note>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_update_note(&body)?;
    let note = NoteOperations::update(state.store.as_ref(), id, changes).await?;
    Ok(ApiResponse::ok(note, "Note updated successfully"))
}

pub async fn delete_note<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = NoteOperations::delete(state.store.as_ref(), id).await?;
    log::info!("Deleted note {}: {:?}", id, deleted);
    Ok(ApiResponse::empty("Note deleted successfully"))
}
