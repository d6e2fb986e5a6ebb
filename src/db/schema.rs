//! Database schema and migrations for feedlist.
//!
//! Migrations are applied in order when the database is first opened or
//! upgraded. The schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users with their reading preferences
    r#"
CREATE TABLE users (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    username            TEXT NOT NULL UNIQUE COLLATE NOCASE,
    default_view_state  INTEGER NOT NULL DEFAULT 2,        -- READ=1, UNREAD=2, FAVORITE=4
    sort_order          TEXT NOT NULL DEFAULT 'desc',      -- 'asc', 'desc'
    posts_per_page      INTEGER NOT NULL DEFAULT 20,
    view_mode           TEXT NOT NULL DEFAULT 'normal',    -- 'normal', 'global'
    feed_token          TEXT NOT NULL DEFAULT '',          -- empty disables token access
    created_at          TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: Categories and feeds
    r#"
CREATE TABLE categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    UNIQUE(user_id, name)
);

CREATE TABLE feeds (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    url         TEXT NOT NULL,
    title       TEXT NOT NULL,
    site_url    TEXT,
    UNIQUE(user_id, url)
);

CREATE INDEX idx_feeds_category_id ON feeds(category_id);
"#,
    // v3: Entries
    r#"
CREATE TABLE entries (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_id      INTEGER NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    guid         TEXT NOT NULL,
    title        TEXT NOT NULL,
    author       TEXT,
    link         TEXT,
    content      TEXT NOT NULL DEFAULT '',
    published_at TEXT,
    is_read      INTEGER NOT NULL DEFAULT 0,
    is_favorite  INTEGER NOT NULL DEFAULT 0,
    UNIQUE(feed_id, guid)
);

CREATE INDEX idx_entries_feed_id ON entries(feed_id);
CREATE INDEX idx_entries_is_read ON entries(is_read);
"#,
    // v4: Tags
    r#"
CREATE TABLE tags (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    UNIQUE(user_id, name)
);

CREATE TABLE entry_tags (
    entry_id    INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    tag_id      INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
    PRIMARY KEY(entry_id, tag_id)
);

CREATE INDEX idx_entry_tags_tag_id ON entry_tags(tag_id);
"#,
    // v5: Per-user log lines
    r#"
CREATE TABLE user_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    level       TEXT NOT NULL,
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_user_logs_user_id ON user_logs(user_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_valid_sql() {
        assert!(!MIGRATIONS.is_empty());
        for migration in MIGRATIONS {
            assert!(!migration.trim().is_empty());
            assert!(migration.contains("CREATE TABLE") || migration.contains("ALTER TABLE"));
        }
    }

    #[test]
    fn test_entries_migration_has_state_columns() {
        let entries = MIGRATIONS[2];
        assert!(entries.contains("CREATE TABLE entries"));
        assert!(entries.contains("is_read"));
        assert!(entries.contains("is_favorite"));
        assert!(entries.contains("UNIQUE(feed_id, guid)"));
    }

    #[test]
    fn test_users_migration_has_reading_preferences() {
        let users = MIGRATIONS[0];
        assert!(users.contains("default_view_state"));
        assert!(users.contains("sort_order"));
        assert!(users.contains("posts_per_page"));
        assert!(users.contains("feed_token"));
    }
}
