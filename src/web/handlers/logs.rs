//! User log handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::db::{LogRepository, User};
use crate::web::dto::{LogLineResponse, LogsQuery, PaginatedResponse, LOG_LINES_PER_PAGE};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{JwtClaims, OptionalAuthUser};

async fn require_session(state: &AppState, claims: Option<&JwtClaims>) -> Result<User, ApiError> {
    state
        .session_user(claims)
        .await?
        .ok_or_else(|| ApiError::forbidden("Access denied"))
}

async fn log_page(
    state: &AppState,
    user_id: i64,
    query: &LogsQuery,
) -> Result<Json<PaginatedResponse<LogLineResponse>>, ApiError> {
    let repo = LogRepository::new(state.db.pool());
    let (offset, limit) = query.to_offset_limit();

    let total = repo.count(user_id).await?;
    let lines = repo.list(user_id, limit, offset).await?;

    Ok(Json(PaginatedResponse::new(
        lines.into_iter().map(LogLineResponse::from).collect(),
        query.page(),
        LOG_LINES_PER_PAGE,
        total.max(0) as u64,
    )))
}

/// GET /logs - The user's log, newest first.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<LogsQuery>,
) -> Result<Json<PaginatedResponse<LogLineResponse>>, ApiError> {
    let user = require_session(&state, claims.as_ref()).await?;
    log_page(&state, user.id, &query).await
}

/// POST /logs - Clear the user's log.
pub async fn clear_logs(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
) -> Result<Json<PaginatedResponse<LogLineResponse>>, ApiError> {
    let user = require_session(&state, claims.as_ref()).await?;

    let deleted = LogRepository::new(state.db.pool()).truncate(user.id).await?;
    tracing::info!(user_id = user.id, deleted, "User log cleared");

    log_page(&state, user.id, &LogsQuery::default()).await
}
