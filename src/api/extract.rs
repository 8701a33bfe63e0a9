use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::schema::QueryParams;

/// Raw JSON body. Shape checks happen in [`crate::schema`], so any
/// well-formed JSON document is accepted here.
#[derive(Debug)]
pub struct JsonPayload(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonPayload(value)),
            Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
        }
    }
}

/// Query string as text pairs, coerced later by the resource schema.
#[derive(Debug)]
pub struct QueryMap(pub QueryParams);

#[async_trait]
impl<S> FromRequestParts<S> for QueryMap
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<QueryParams>::from_request_parts(parts, state).await {
            Ok(Query(params)) => Ok(QueryMap(params)),
            Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
        }
    }
}
