use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::api::state::AppState;
use crate::api::{
    auth, event_handlers, feedback_handlers, handlers, note_handlers, pet_handlers, request_log,
    status_handlers, user_handlers,
};
use crate::config::CorsConfig;
use crate::store::traits::Store;

/// Unsupported methods on a known path still answer with the failure envelope.
fn methods<S: Store + 'static>(router: MethodRouter<AppState<S>>) -> MethodRouter<AppState<S>> {
    router.fallback(handlers::method_not_allowed)
}

/// Resource routes, relative to the versioned base path. The action-style
/// paths (`/user/list`, `/event/create`, ...) are aliases of the bare
/// collection routes; static segments win over `:id`/`:username`.
fn resource_routes<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Users
        .route(
            "/user",
            methods(
                get(user_handlers::list_users::<S>).put(user_handlers::update_or_create_user::<S>),
            ),
        )
        .route("/user/list", methods(get(user_handlers::list_users::<S>)))
        .route(
            "/user/update-or-create",
            methods(put(user_handlers::update_or_create_user::<S>)),
        )
        .route(
            "/user/:username",
            methods(get(user_handlers::get_user_by_username::<S>)),
        )
        // Notes
        .route(
            "/note",
            methods(get(note_handlers::list_notes::<S>).post(note_handlers::create_note::<S>)),
        )
        .route(
            "/note/:id",
            methods(
                get(note_handlers::get_note::<S>)
                    .put(note_handlers::update_note::<S>)
                    .delete(note_handlers::delete_note::<S>),
            ),
        )
        // Statuses
        .route(
            "/status",
            methods(
                get(status_handlers::list_statuses::<S>).post(status_handlers::create_status::<S>),
            ),
        )
        .route(
            "/status/create",
            methods(post(status_handlers::create_status::<S>)),
        )
        .route(
            "/status/list",
            methods(get(status_handlers::list_statuses::<S>)),
        )
        .route(
            "/status/:id",
            methods(
                get(status_handlers::get_status::<S>)
                    .put(status_handlers::update_status::<S>)
                    .delete(status_handlers::delete_status::<S>),
            ),
        )
        // Pets
        .route(
            "/pet",
            methods(get(pet_handlers::list_pets::<S>).post(pet_handlers::create_pet::<S>)),
        )
        .route(
            "/pet/:id",
            methods(
                get(pet_handlers::get_pet::<S>)
                    .put(pet_handlers::update_pet::<S>)
                    .delete(pet_handlers::delete_pet::<S>),
            ),
        )
        // Feedback (append-only)
        .route(
            "/feedback",
            methods(
                get(feedback_handlers::list_feedback::<S>)
                    .post(feedback_handlers::create_feedback::<S>),
            ),
        )
        .route(
            "/feedback/:id",
            methods(get(feedback_handlers::get_feedback::<S>)),
        )
        // Events
        .route(
            "/event",
            methods(get(event_handlers::list_events::<S>).post(event_handlers::create_event::<S>)),
        )
        .route(
            "/event/create",
            methods(post(event_handlers::create_event::<S>)),
        )
        .route("/event/list", methods(get(event_handlers::list_events::<S>)))
        .route(
            "/event/:id",
            methods(
                get(event_handlers::get_event::<S>)
                    .put(event_handlers::update_event::<S>)
                    .delete(event_handlers::delete_event::<S>),
            ),
        )
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins = config.allowed_origins.iter().filter_map(|origin| {
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        });
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    let api = resource_routes::<S>().route_layer(middleware::from_fn_with_state(
        state.config.clone(),
        auth::require_static_token,
    ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest(&state.config.base_path(), api)
        .fallback(handlers::fallback)
        .layer(middleware::from_fn(request_log::log_requests))
        .layer(cors_layer(&state.config.cors))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(config: AppConfig) -> Router {
        create_router(AppState::new(Arc::new(MemoryStore::new()), config))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn token_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.static_token = Some("letmein".to_string());
        config
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app(token_config())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_api_requires_token_when_configured() {
        let response = app(token_config())
            .oneshot(Request::get("/api/v1/note").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = json_body(response).await;
        assert_eq!(json["errors"]["name"], "UNAUTHORIZED");

        let response = app(token_config())
            .oneshot(
                Request::get("/api/v1/note")
                    .header("authorization", "Bearer letmein")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_uses_envelope() {
        let response = app(AppConfig::default())
            .oneshot(Request::get("/api/v1/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"]["message"], "Cannot GET /api/v1/nothing");
    }

    #[tokio::test]
    async fn test_unsupported_method_uses_envelope() {
        let response = app(AppConfig::default())
            .oneshot(Request::delete("/api/v1/feedback/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], serde_json::Value::Null);
        assert_eq!(json["errors"]["name"], "METHOD_NOT_ALLOWED");
        assert_eq!(json["message"], "Cannot DELETE /api/v1/feedback/1");
    }

    #[tokio::test]
    async fn test_action_paths_win_over_path_params() {
        for path in ["/api/v1/user/list", "/api/v1/event/list", "/api/v1/status/list"] {
            let response = app(AppConfig::default())
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
            let json = json_body(response).await;
            assert_eq!(json["data"]["pagination"]["totalItems"], 0, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let response = app(AppConfig::default())
            .oneshot(
                Request::post("/api/v1/note")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["errors"]["name"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_cors_preflight_reflects_allowed_origin() {
        let response = app(AppConfig::default())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/pet")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }
}
