use axum::extract::{Path, State};

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::api::extract::{JsonPayload, QueryMap};
use crate::api::state::AppState;
use crate::logic::UserOperations;
use crate::model::{Paginated, User, UserDetails, UserWithCounts};
use crate::schema::user::{parse_list_users, parse_update_or_create_user};
use crate::store::traits::Store;

pub async fn list_users<S: Store>(
    State(state): State<AppState<S>>,
    QueryMap(query): QueryMap,
) -> Result<ApiResponse<Paginated<UserWithCounts>>, ApiError> {
    let query = parse_list_users(&query)?;
    let page = UserOperations::list(state.store.as_ref(), query).await?;
    Ok(ApiResponse::ok(page, "Users retrieved successfully"))
}

/// Always 200, whether the username was new or already taken.
pub async fn update_or_create_user<S: Store>(
    State(state): State<AppState<S>>,
    JsonPayload(body): JsonPayload,
) -> Result<ApiResponse<User>, ApiError> {
    let user = parse_update_or_create_user(&body)?;
    let (user, created) = UserOperations::update_or_create(state.store.as_ref(), user).await?;
    if created {
        log::info!("Created user {} ({})", user.username, user.id);
    }
    Ok(ApiResponse::ok(user, "User updated or created successfully"))
}

pub async fn get_user_by_username<S: Store>(
    State(state): State<AppState<S>>,
    Path(username): Path<String>,
) -> Result<ApiResponse<UserDetails>, ApiError> {
    let user = UserOperations::details(state.store.as_ref(), &username).await?;
    Ok(ApiResponse::ok(user, "User retrieved successfully"))
}
