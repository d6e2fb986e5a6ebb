//! HTTP handlers and their shared state.

pub mod index;
pub mod logs;

pub use index::*;
pub use logs::*;

use crate::config::{Config, ReadingConfig, SiteConfig, WebConfig};
use crate::db::{LogRepository, User, UserRepository};
use crate::listing::{ContextResolver, ListingError, RequestParams, ScopeSummary};
use crate::web::error::ApiError;
use crate::web::middleware::{feed_token_matches, JwtClaims};
use crate::Database;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database.
    pub db: Database,
    /// Site information.
    pub site: SiteConfig,
    /// Web access settings.
    pub web: WebConfig,
    /// Reading defaults and bounds.
    pub reading: ReadingConfig,
}

/// How a request was granted access to a user's entries.
#[derive(Debug, Clone)]
pub enum Access {
    /// A valid session token for the user.
    Session(User),
    /// Anonymous reading of the default user's entries.
    Anonymous(User),
    /// The user's feed token.
    Token(User),
}

impl Access {
    /// The user whose entries are listed.
    pub fn user(&self) -> &User {
        match self {
            Access::Session(user) | Access::Anonymous(user) | Access::Token(user) => user,
        }
    }
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            site: config.site.clone(),
            web: config.web.clone(),
            reading: config.reading.clone(),
        }
    }

    /// Resolver bounded by the configured maximum page size.
    pub fn resolver(&self) -> ContextResolver {
        ContextResolver::new(self.reading.max_posts_per_page)
    }

    /// User of a valid session, if any.
    pub async fn session_user(&self, claims: Option<&JwtClaims>) -> Result<Option<User>, ApiError> {
        let Some(claims) = claims else {
            return Ok(None);
        };
        let user = UserRepository::new(self.db.pool()).get_by_id(claims.sub).await?;
        if user.is_none() {
            tracing::debug!(user_id = claims.sub, "Session token for unknown user");
        }
        Ok(user)
    }

    /// The configured default user, if anonymous reading is allowed.
    async fn anonymous_user(&self) -> Result<Option<User>, ApiError> {
        if !self.web.allow_anonymous || self.web.default_user.is_empty() {
            return Ok(None);
        }
        let user = UserRepository::new(self.db.pool())
            .get_by_username(&self.web.default_user)
            .await?;
        if user.is_none() {
            tracing::warn!(username = %self.web.default_user, "Default user does not exist");
        }
        Ok(user)
    }

    /// Access through a session, or anonymously when allowed.
    pub async fn reader_access(
        &self,
        claims: Option<&JwtClaims>,
    ) -> Result<Option<Access>, ApiError> {
        if let Some(user) = self.session_user(claims).await? {
            return Ok(Some(Access::Session(user)));
        }
        Ok(self.anonymous_user().await?.map(Access::Anonymous))
    }

    /// Access through the `token` parameter.
    ///
    /// The user is named by the `user` parameter, falling back to the
    /// default user.
    pub async fn token_access(&self, params: &RequestParams) -> Result<Option<Access>, ApiError> {
        let username = match params.get("user").map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.web.default_user.as_str(),
        };
        if username.is_empty() {
            return Ok(None);
        }

        let Some(user) = UserRepository::new(self.db.pool())
            .get_by_username(username)
            .await?
        else {
            return Ok(None);
        };

        let presented = params.get("token").unwrap_or("");
        if feed_token_matches(&user.reading_config().access_token, presented) {
            Ok(Some(Access::Token(user)))
        } else {
            Ok(None)
        }
    }

    /// Access to the feed export.
    ///
    /// A `user` or `token` parameter is checked as a feed token first.
    /// Otherwise a session or anonymous reading applies, but only for the
    /// user named by `user`, if any.
    pub async fn feed_access(
        &self,
        claims: Option<&JwtClaims>,
        params: &RequestParams,
    ) -> Result<Option<Access>, ApiError> {
        let named = params
            .get("user")
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let has_token = params.get("token").is_some_and(|token| !token.is_empty());

        if named.is_some() || has_token {
            if let Some(access) = self.token_access(params).await? {
                return Ok(Some(access));
            }
        }

        let access = self.reader_access(claims).await?;
        Ok(access.filter(|access| {
            named.map_or(true, |name| access.user().username.eq_ignore_ascii_case(name))
        }))
    }

    /// Log a listing failure and turn it into a response.
    ///
    /// Store failures are also written to the user's log.
    pub async fn listing_error(&self, user_id: i64, err: ListingError) -> ApiError {
        match &err {
            ListingError::ListingFailed(source) => {
                tracing::info!(user_id, error = %source, "Entry listing failed");
                let logs = LogRepository::new(self.db.pool());
                if let Err(e) = logs.append(user_id, "notice", &source.to_string()).await {
                    tracing::warn!(user_id, error = %e, "Failed to write user log");
                }
            }
            _ => tracing::debug!(user_id, error = %err, "Rejected listing request"),
        }
        ApiError::from(err)
    }

    /// `"<scope> | <site>"`, the title of a scope's RSS export.
    pub fn rss_title(&self, summary: &ScopeSummary) -> String {
        format!("{} | {}", summary.name, self.site.title)
    }
}

/// Page title of a scope, prefixed with its unread count when non-zero.
pub fn page_title(summary: &ScopeSummary) -> String {
    if summary.unread > 0 {
        format!("({}) · {}", summary.unread, summary.name)
    } else {
        summary.name.clone()
    }
}
