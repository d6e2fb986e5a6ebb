//! Entry views: index redirect, normal view, global view, RSS export.

use std::collections::HashMap;

use axum::{
    extract::{Query, RawQuery, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::db::{User, ViewMode};
use crate::entry::EntryRepository;
use crate::listing::{EntryLister, ListingError, RequestParams, Resolved};
use crate::web::dto::{
    AboutResponse, ApiResponse, CategoryResponse, ContextResponse, EntryResponse, GlobalResponse,
    ListingMeta, ListingResponse,
};
use crate::web::error::ApiError;
use crate::web::export::{render_rss, RssChannel, RSS_CONTENT_TYPE};
use crate::web::handlers::{page_title, AppState};
use crate::web::middleware::OptionalAuthUser;

/// Title of the global view.
pub const GLOBAL_VIEW_TITLE: &str = "Global view";

async fn resolve(
    state: &AppState,
    lister: &EntryLister<'_, EntryRepository<'_>>,
    user: &User,
    params: &RequestParams,
) -> Result<Resolved, ApiError> {
    match lister.resolve(user.id, params, &user.reading_config()).await {
        Ok(resolved) => Ok(resolved),
        Err(e) => Err(state.listing_error(user.id, e).await),
    }
}

/// GET / - Redirect to the preferred view.
///
/// The query string is carried over.
pub async fn index(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    RawQuery(query): RawQuery,
) -> Result<Redirect, ApiError> {
    let mode = match state.session_user(claims.as_ref()).await? {
        Some(user) => user.view_mode,
        None => state.reading.view_mode.parse::<ViewMode>().unwrap_or_default(),
    };

    let target = match query {
        Some(query) if !query.is_empty() => format!("/{mode}?{query}"),
        _ => format!("/{mode}"),
    };
    Ok(Redirect::to(&target))
}

/// GET /normal - One page of entries.
pub async fn normal(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListingResponse>, ApiError> {
    let access = state
        .reader_access(claims.as_ref())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Login required"))?;
    let user = access.user();
    let params = RequestParams::from(query);

    let repo = EntryRepository::new(state.db.pool());
    let lister = EntryLister::new(&repo, state.resolver());
    let Resolved { context, summary } = resolve(&state, &lister, user, &params).await?;

    let page = match lister.page(user.id, &context).await {
        Ok(page) => page,
        Err(e) => return Err(state.listing_error(user.id, e).await),
    };

    let categories = repo.list_categories_with_unread(user.id).await?;

    Ok(Json(ListingResponse {
        data: page.entries.into_iter().map(EntryResponse::from).collect(),
        meta: ListingMeta {
            next_cursor: page.next_cursor,
            title: page_title(&summary),
            rss_title: state.rss_title(&summary),
            unread: summary.unread,
            context: ContextResponse::from(&context),
            categories: categories.into_iter().map(CategoryResponse::from).collect(),
        },
    }))
}

/// GET /global - Categories overview.
pub async fn global(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<GlobalResponse>>, ApiError> {
    let access = state
        .reader_access(claims.as_ref())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Login required"))?;
    let user = access.user();
    let params = RequestParams::from(query);

    let repo = EntryRepository::new(state.db.pool());
    let lister = EntryLister::new(&repo, state.resolver());
    let Resolved { summary, .. } = resolve(&state, &lister, user, &params).await?;

    let categories = repo.list_categories_with_unread(user.id).await?;

    Ok(Json(ApiResponse::new(GlobalResponse {
        title: GLOBAL_VIEW_TITLE.to_string(),
        rss_title: state.rss_title(&summary),
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    })))
}

/// GET /rss - RSS export of a listing.
///
/// Readable with the feed token of the user named by `user` (default
/// user otherwise), with a session, or anonymously when allowed. The
/// look-ahead entry is not trimmed.
pub async fn rss(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let params = RequestParams::from(query);

    let access = state
        .feed_access(claims.as_ref(), &params)
        .await?
        .ok_or(ListingError::AccessDenied)?;
    let user = access.user();

    let repo = EntryRepository::new(state.db.pool());
    let lister = EntryLister::new(&repo, state.resolver());
    let Resolved { context, summary } = resolve(&state, &lister, user, &params).await?;

    let entries = match lister.full(user.id, &context).await {
        Ok(entries) => entries,
        Err(e) => return Err(state.listing_error(user.id, e).await),
    };

    let title = state.rss_title(&summary);
    let xml = render_rss(
        &RssChannel {
            title: &title,
            description: &state.site.description,
        },
        &entries,
    )?;

    Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response())
}

/// GET /about - Site information.
pub async fn about(State(state): State<Arc<AppState>>) -> Json<ApiResponse<AboutResponse>> {
    Json(ApiResponse::new(AboutResponse {
        title: state.site.title.clone(),
        description: state.site.description.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
