//! Router configuration for the web surface.

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{about, clear_logs, global, index, list_logs, normal, rss, AppState};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let view_routes = Router::new()
        .route("/", get(index))
        .route("/normal", get(normal))
        .route("/global", get(global))
        .route("/rss", get(rss))
        .route("/about", get(about))
        .route("/logs", get(list_logs).post(clear_logs));

    view_routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
        .merge(create_health_router())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
