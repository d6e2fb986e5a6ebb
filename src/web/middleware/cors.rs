//! CORS layer for the entry views.

use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Methods the views answer to.
const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

/// Create a CORS layer from the configured origins.
///
/// Without valid origins any origin may read, but never with credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed = parse_origins(origins);

    if parsed.is_empty() {
        CorsLayer::new()
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods(ALLOWED_METHODS)
            .allow_headers([AUTHORIZATION, ACCEPT])
            .allow_credentials(true)
            .allow_origin(parsed)
    }
}
