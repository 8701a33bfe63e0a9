use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::config::AppConfig;

/// Rejects requests whose `Authorization` header does not carry the
/// configured static token, either bare or as `Bearer <token>`.
pub async fn require_static_token(
    State(config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = config.auth.static_token.as_deref() else {
        return next.run(request).await;
    };

    match check_token(request.headers(), expected) {
        Ok(()) => next.run(request).await,
        Err(err) => err.into_response(),
    }
}

fn check_token(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let header = extract_header_value(headers, "authorization")
        .ok_or(ApiError::Unauthorized("Missing authorization header"))?;
    let token = header.strip_prefix("Bearer ").unwrap_or(&header);
    if token == expected {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Invalid token"))
    }
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}
