use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::api::envelope::{Envelope, ErrorBody};
use crate::error::DomainError;
use crate::schema::Violations;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Everything a handler or middleware can fail with.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Unauthorized(&'static str),
    /// The body could not be read as JSON.
    MalformedBody(String),
    RouteNotFound { method: String, path: String },
    MethodNotAllowed { method: String, path: String },
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<Violations> for ApiError {
    fn from(violations: Violations) -> Self {
        ApiError::Domain(DomainError::Validation(violations))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(DomainError::ReferencedEntityNotFound { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Domain(DomainError::TargetNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Domain(DomainError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ApiError::Domain(DomainError::Validation(_)) => "VALIDATION_ERROR",
            ApiError::Domain(DomainError::ReferencedEntityNotFound { .. }) => {
                "REFERENCED_ENTITY_NOT_FOUND"
            }
            ApiError::Domain(DomainError::TargetNotFound { .. }) => "NOT_FOUND",
            ApiError::Domain(DomainError::Store(_)) => "INTERNAL_SERVER_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::MalformedBody(_) => "BAD_REQUEST",
            ApiError::RouteNotFound { .. } => "NOT_FOUND",
            ApiError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
        }
    }

    /// Client-facing message; store failures are never echoed back.
    pub fn message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::Store(_)) => INTERNAL_MESSAGE.to_string(),
            ApiError::Domain(err) => err.to_string(),
            ApiError::Unauthorized(message) => message.to_string(),
            ApiError::MalformedBody(detail) => detail.clone(),
            ApiError::RouteNotFound { method, path }
            | ApiError::MethodNotAllowed { method, path } => format!("Cannot {} {}", method, path),
        }
    }

    fn body(self) -> ErrorBody {
        let name = self.name();
        let message = self.message();
        let validation_errors = match self {
            ApiError::Domain(DomainError::Validation(violations)) => Some(violations),
            _ => None,
        };
        ErrorBody {
            name,
            message,
            validation_errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Domain(DomainError::Store(err)) => log::error!("store failure: {:#}", err),
            ApiError::Domain(DomainError::Validation(violations)) => {
                log::warn!("rejected request: {}", violations)
            }
            other => log::debug!("{}: {}", other.name(), other.message()),
        }

        let status = self.status();
        (status, Json(Envelope::failure(self.body()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TargetKey;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(Violations::single("id", "bad")), StatusCode::BAD_REQUEST),
            (
                ApiError::from(DomainError::referenced("User", 9)),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ApiError::from(DomainError::not_found("Pet", 9)), StatusCode::NOT_FOUND),
            (
                ApiError::from(DomainError::Store(anyhow::anyhow!("boom"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Unauthorized("Invalid token"), StatusCode::UNAUTHORIZED),
            (
                ApiError::MethodNotAllowed {
                    method: "DELETE".to_string(),
                    path: "/api/v1/feedback/1".to_string(),
                },
                StatusCode::METHOD_NOT_ALLOWED,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{}", error.name());
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_redacted() {
        let error = ApiError::from(DomainError::Store(anyhow::anyhow!(
            "password authentication failed for user postgres"
        )));
        let json = body_json(error.into_response()).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["errors"]["name"], "INTERNAL_SERVER_ERROR");
        assert_eq!(json["errors"]["validationErrors"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_not_found_by_username() {
        let error = ApiError::from(DomainError::TargetNotFound {
            entity: "User",
            key: TargetKey::Username("nonexistent".to_string()),
        });
        let json = body_json(error.into_response()).await;
        assert_eq!(json["errors"]["message"], "User with username 'nonexistent' not found");
        assert_eq!(json["data"], serde_json::Value::Null);
    }
}
