//! Per-user log storage.
//!
//! Lines shown on the logs page. Process-wide diagnostics go through
//! `tracing`; only events a reader should see are stored here.

use super::DbPool;
use crate::{FeedlistError, Result};

/// A stored log line.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LogLine {
    /// Line ID.
    pub id: i64,
    /// Severity ("notice", "warning", "error").
    pub level: String,
    /// Message text.
    pub message: String,
    /// When the line was written.
    pub created_at: String,
}

/// Repository for per-user log lines.
pub struct LogRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> LogRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Append a line to a user's log.
    pub async fn append(&self, user_id: i64, level: &str, message: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO user_logs (user_id, level, message) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(level)
            .bind(message)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    /// List one page of a user's log, newest first.
    pub async fn list(&self, user_id: i64, limit: u32, offset: u32) -> Result<Vec<LogLine>> {
        let lines = sqlx::query_as::<_, LogLine>(
            "SELECT id, level, message, created_at
             FROM user_logs
             WHERE user_id = ?
             ORDER BY id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(self.pool)
        .await
        .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(lines)
    }

    /// Count a user's log lines.
    pub async fn count(&self, user_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_logs WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Delete every line of a user's log.
    pub async fn truncate(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM user_logs WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
