use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::FeedbackOperations;
use crate::model::{Feedback, Paginated};
use crate::schema::feedback::{parse_create_feedback, parse_list_feedback};
use crate::schema::parse_id;
use crate::store::traits::Store;

pub async fn create_feedback<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<Feedback>, ApiError> {
    let new_feedback = parse_create_feedback(&body)?;
    let feedback = FeedbackOperations::create(state.store.as_ref(), new_feedback).await?;
    log::info!("Created {} feedback {}", feedback.kind, feedback.id);
    Ok(ApiResponse::created(feedback, "Feedback created successfully"))
}

pub async fn list_feedback<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<Feedback>>, ApiError> {
    let query = parse_list_feedback(&query)?;
    let page = FeedbackOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Feedbacks retrieved successfully"))
}

pub async fn get_feedback<S: Store>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Feedback>, ApiError> {
    let id = parse_id(&id)?;
    let feedback = FeedbackOperations::get(state.store.as_ref(), id).await?;
    Ok(ApiResponse::ok(feedback, "Feedback retrieved successfully"))
}
