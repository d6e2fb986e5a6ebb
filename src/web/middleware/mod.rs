//! Middleware for the web surface.

pub mod auth;
pub mod cors;

pub use auth::{feed_token_matches, jwt_auth, JwtClaims, JwtState, OptionalAuthUser};
pub use cors::create_cors_layer;
