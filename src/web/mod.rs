//! HTTP surface for feedlist.
//!
//! Entry views (normal, global, RSS export) backed by the listing core,
//! plus the about, logs and health routes.

pub mod dto;
pub mod error;
pub mod export;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
