use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::EventOperations;
use crate::model::{Event, Paginated};
use crate::schema::event::{parse_create_event, parse_list_events, parse_update_event};
use crate::schema::parse_id;
use crate::store::traits::Store;

pub async fn create_event<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Event>, ApiError> {
    let new_event = parse_create_event(&body)?;
    let event = EventOperations::create(state.store.as_ref(), new_event).await?;
    log::info!("Created event {}", event.id);
    Ok(ApiResponse::created(event, "Event created successfully"))
}

pub async fn list_events<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<Event>>, ApiError> {
    let query = parse_list_events(&query)?;
    let page = EventOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Events retrieved successfully"))
}

pub async fn get_event<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>, ApiError> {
    let id = parse_id(&id)?;
    let event = EventOperations::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(event, "Event retrieved successfully"))
}

pub async fn update_event<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Event>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_update_event(&body)?;
    let event = EventOperations::update(state.store.as_ref(), id, changes).await?;
    Ok(ApiResponse::ok(event, "Event updated successfully"))
}

pub async fn delete_event<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = EventOperations::delete(state.store.as_ref(), id).await?;
    log::info!("Deleted event {}: {:?}", id, deleted);
    Ok(ApiResponse::empty("Event deleted successfully"))
}
