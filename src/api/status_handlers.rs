use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::StatusOperations;
use crate::model::{Paginated, Status};
use crate::schema::status::{parse_create_status, parse_list_statuses, parse_update_status};
use crate::schema::parse_id;
use crate::store::traits::Store;

pub async fn create_status<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Status>, ApiError> {
    let new_status = parse_create_status(&body)?;
    let status = StatusOperations::create(state.store.as_ref(), new_status).await?;
    log::info!("Created status {}", status.id);
    Ok(ApiResponse::created(status, "Status created successfully"))
}

pub async fn list_statuses<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<Status>>, ApiError> {
    let query = parse_list_statuses(&query)?;
    let page = StatusOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Statuses retrieved successfully"))
}

pub async fn get_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Status>, ApiError> {
    let id = parse_id(&id)?;
    let status = StatusOperations::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(status, "Status retrieved successfully"))
}

pub async fn update_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Status>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_update_status(&body)?;
    let status = StatusOperations::update(state.store.as_ref(), id, changes).await?;
    Ok(ApiResponse::ok(status, "Status updated successfully"))
}

pub async fn delete_status<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = StatusOperations::delete(state.store.as_ref(), id).await?;
    log::info!("Deleted status {}: {:?}", id, deleted);
    Ok(ApiResponse::empty("Status deleted successfully"))
}
