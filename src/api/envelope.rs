use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::schema::Violations;

/// Failure details carried in `errors`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub name: &'static str,
    pub message: String,
    pub validation_errors: Option<Violations>,
}

/// Body shape shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub errors: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            errors: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(errors: ErrorBody) -> Self {
        Self {
            success: false,
            message: errors.message.clone(),
            data: None,
            errors: Some(errors),
        }
    }
}

/// A successful envelope together with its status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::success(message, Some(data)),
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            envelope: Envelope::success(message, Some(data)),
        }
    }
}

impl ApiResponse<()> {
    /// `data: null`, used by deletes.
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            envelope: Envelope::success(message, None),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
