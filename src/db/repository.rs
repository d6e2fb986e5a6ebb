//! User repository for feedlist.

use sqlx::QueryBuilder;

use super::user::{NewUser, User, UserReadingUpdate, ViewMode};
use super::DbPool;
use crate::listing::{SortOrder, StateMask};
use crate::{FeedlistError, Result};

/// Row type for users from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    default_view_state: i64,
    sort_order: String,
    posts_per_page: i64,
    view_mode: String,
    feed_token: String,
    created_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            default_view_state: u8::try_from(row.default_view_state)
                .ok()
                .and_then(StateMask::from_bits)
                .unwrap_or(StateMask::UNREAD),
            sort_order: SortOrder::parse(&row.sort_order).unwrap_or_default(),
            posts_per_page: u32::try_from(row.posts_per_page)
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(20),
            view_mode: row.view_mode.parse().unwrap_or(ViewMode::Normal),
            feed_token: row.feed_token,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, default_view_state, sort_order, posts_per_page, \
                            view_mode, feed_token, created_at";

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (username, default_view_state, sort_order, posts_per_page, view_mode, feed_token)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(i64::from(new_user.default_view_state.bits()))
        .bind(new_user.sort_order.as_str())
        .bind(i64::from(new_user.posts_per_page))
        .bind(new_user.view_mode.as_str())
        .bind(&new_user.feed_token)
        .execute(self.pool)
        .await
        .map_err(|e| FeedlistError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FeedlistError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// Update reading preferences.
    ///
    /// Only fields that are set in the update are modified.
    /// Returns the updated user, or None if not found.
    pub async fn update_reading_config(
        &self,
        id: i64,
        update: &UserReadingUpdate,
    ) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(mask) = update.default_view_state {
            separated.push("default_view_state = ");
            separated.push_bind_unseparated(i64::from(mask.bits()));
        }
        if let Some(order) = update.sort_order {
            separated.push("sort_order = ");
            separated.push_bind_unseparated(order.as_str());
        }
        if let Some(posts_per_page) = update.posts_per_page {
            separated.push("posts_per_page = ");
            separated.push_bind_unseparated(i64::from(posts_per_page));
        }
        if let Some(view_mode) = update.view_mode {
            separated.push("view_mode = ");
            separated.push_bind_unseparated(view_mode.as_str());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Replace the feed token. An empty token disables token access.
    pub async fn set_feed_token(&self, id: i64, token: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET feed_token = ? WHERE id = ?")
            .bind(token)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
