//! Entry repository for feedlist.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use super::search::{like_pattern, SearchQuery};
use super::types::{Category, CategoryWithUnread, Entry, Feed, NewEntry, Tag};
use crate::db::DbPool;
use crate::listing::{Cursor, EntryFilter, EntryStore, Scope, ScopeSummary, SortOrder};
use crate::{FeedlistError, Result};

/// Display name of [`Scope::All`].
pub const ALL_SCOPE_NAME: &str = "Main stream";

/// Display name of [`Scope::Favorites`].
pub const FAVORITES_SCOPE_NAME: &str = "Favorites";

/// Row type for entries joined with their feed.
#[derive(Debug, Clone, sqlx::FromRow)]
struct EntryRow {
    id: i64,
    feed_id: i64,
    feed_title: String,
    guid: String,
    title: String,
    author: Option<String>,
    link: Option<String>,
    content: String,
    published_at: Option<String>,
    is_read: bool,
    is_favorite: bool,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Entry {
            id: row.id,
            feed_id: row.feed_id,
            feed_title: row.feed_title,
            guid: row.guid,
            title: row.title,
            author: row.author,
            link: row.link,
            content: row.content,
            published_at: row.published_at.and_then(|s| parse_datetime(&s)),
            is_read: row.is_read,
            is_favorite: row.is_favorite,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryWithUnreadRow {
    id: i64,
    user_id: i64,
    name: String,
    feed_count: i64,
    unread_count: i64,
}

impl From<CategoryWithUnreadRow> for CategoryWithUnread {
    fn from(row: CategoryWithUnreadRow) -> Self {
        CategoryWithUnread {
            category: Category {
                id: row.id,
                user_id: row.user_id,
                name: row.name,
            },
            feed_count: row.feed_count,
            unread_count: row.unread_count,
        }
    }
}

const ENTRY_SELECT: &str = "SELECT e.id, e.feed_id, f.title AS feed_title, e.guid, e.title, \
                            e.author, e.link, e.content, e.published_at, e.is_read, e.is_favorite \
                            FROM entries e JOIN feeds f ON f.id = e.feed_id";

/// Repository for categories, feeds, tags and their entries.
pub struct EntryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EntryRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a category.
    pub async fn create_category(&self, user_id: i64, name: &str) -> Result<Category> {
        let result = sqlx::query("INSERT INTO categories (user_id, name) VALUES (?, ?)")
            .bind(user_id)
            .bind(name)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(Category {
            id: result.last_insert_rowid(),
            user_id,
            name: name.to_string(),
        })
    }

    /// Subscribe a user to a feed filed under `category_id`.
    ///
    /// The category must belong to the same user.
    pub async fn create_feed(
        &self,
        user_id: i64,
        category_id: i64,
        url: &str,
        title: &str,
    ) -> Result<Feed> {
        let owner: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        match owner {
            Some((owner,)) if owner == user_id => {}
            _ => return Err(FeedlistError::NotFound("category".to_string())),
        }

        let result =
            sqlx::query("INSERT INTO feeds (user_id, category_id, url, title) VALUES (?, ?, ?, ?)")
                .bind(user_id)
                .bind(category_id)
                .bind(url)
                .bind(title)
                .execute(self.pool)
                .await
                .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(Feed {
            id: result.last_insert_rowid(),
            user_id,
            category_id,
            url: url.to_string(),
            title: title.to_string(),
            site_url: None,
        })
    }

    /// Insert an entry, ignoring it if the feed already has its guid.
    ///
    /// Returns the new entry ID, or None if it already existed.
    pub async fn insert_entry(&self, entry: &NewEntry) -> Result<Option<i64>> {
        let published_at = entry.published_at.map(|dt| dt.to_rfc3339());

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO entries
                (feed_id, guid, title, author, link, content, published_at, is_read, is_favorite)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.feed_id)
        .bind(&entry.guid)
        .bind(&entry.title)
        .bind(&entry.author)
        .bind(&entry.link)
        .bind(&entry.content)
        .bind(&published_at)
        .bind(entry.is_read)
        .bind(entry.is_favorite)
        .execute(self.pool)
        .await
        .map_err(|e| FeedlistError::Database(e.to_string()))?;

        if result.rows_affected() > 0 {
            Ok(Some(result.last_insert_rowid()))
        } else {
            Ok(None)
        }
    }

    /// Create a tag.
    pub async fn create_tag(&self, user_id: i64, name: &str) -> Result<Tag> {
        let result = sqlx::query("INSERT INTO tags (user_id, name) VALUES (?, ?)")
            .bind(user_id)
            .bind(name)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            user_id,
            name: name.to_string(),
        })
    }

    /// Attach a tag to an entry. Attaching twice is a no-op.
    pub async fn tag_entry(&self, entry_id: i64, tag_id: i64) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO entry_tags (entry_id, tag_id) VALUES (?, ?)")
            .bind(entry_id)
            .bind(tag_id)
            .execute(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(())
    }

    /// List a user's categories with feed and unread counts, by name.
    pub async fn list_categories_with_unread(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryWithUnread>> {
        let rows = sqlx::query_as::<_, CategoryWithUnreadRow>(
            r#"
            SELECT c.id, c.user_id, c.name,
                   (SELECT COUNT(*) FROM feeds f WHERE f.category_id = c.id) AS feed_count,
                   (SELECT COUNT(*) FROM entries e JOIN feeds f ON f.id = e.feed_id
                    WHERE f.category_id = c.id AND e.is_read = 0) AS unread_count
            FROM categories c
            WHERE c.user_id = ?
            ORDER BY c.name COLLATE NOCASE ASC, c.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(CategoryWithUnread::from).collect())
    }

    /// Count unread entries of a user within a scope.
    pub async fn count_unread(&self, user_id: i64, scope: &Scope) -> Result<i64> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) FROM entries e JOIN feeds f ON f.id = e.feed_id WHERE e.is_read = 0 AND f.user_id = ",
        );
        query.push_bind(user_id);
        push_scope(&mut query, scope);

        let count: (i64,) = query
            .build_query_as()
            .fetch_one(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(count.0)
    }

    async fn scope_name(&self, user_id: i64, scope: &Scope) -> Result<Option<String>> {
        let sql = match scope {
            Scope::All => return Ok(Some(ALL_SCOPE_NAME.to_string())),
            Scope::Favorites => return Ok(Some(FAVORITES_SCOPE_NAME.to_string())),
            Scope::Category(_) => "SELECT name FROM categories WHERE id = ? AND user_id = ?",
            Scope::Feed(_) => "SELECT title FROM feeds WHERE id = ? AND user_id = ?",
            Scope::Tag(_) => "SELECT name FROM tags WHERE id = ? AND user_id = ?",
        };

        let name: Option<(String,)> = sqlx::query_as(sql)
            .bind(scope.id())
            .bind(user_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;
        Ok(name.map(|(name,)| name))
    }
}

impl EntryStore for EntryRepository<'_> {
    async fn describe_scope(&self, user_id: i64, scope: &Scope) -> Result<Option<ScopeSummary>> {
        let Some(name) = self.scope_name(user_id, scope).await? else {
            return Ok(None);
        };
        let unread = self.count_unread(user_id, scope).await?;
        Ok(Some(ScopeSummary { name, unread }))
    }

    async fn list_where(&self, user_id: i64, filter: &EntryFilter<'_>) -> Result<Vec<Entry>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(ENTRY_SELECT);
        query.push(" WHERE f.user_id = ");
        query.push_bind(user_id);

        push_scope(&mut query, &filter.scope);

        if let Some(read) = filter.state.read_filter() {
            query.push(" AND e.is_read = ");
            query.push_bind(read);
        }
        if filter.state.favorites_only() {
            query.push(" AND e.is_favorite = 1");
        }

        match filter.cursor {
            None => {}
            Some(Cursor::At(id)) => {
                query.push(match filter.order {
                    SortOrder::Asc => " AND e.id >= ",
                    SortOrder::Desc => " AND e.id <= ",
                });
                query.push_bind(id);
            }
            Some(Cursor::Unmatched) => {
                query.push(" AND 0");
            }
        }

        push_search(&mut query, &SearchQuery::parse(filter.search));

        query.push(format!(" ORDER BY e.id {} LIMIT ", filter.order.sql()));
        query.push_bind(i64::from(filter.limit));

        let rows = query
            .build_query_as::<EntryRow>()
            .fetch_all(self.pool)
            .await
            .map_err(|e| FeedlistError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }
}

fn push_scope(query: &mut QueryBuilder<'_, Sqlite>, scope: &Scope) {
    match scope {
        Scope::All => {}
        Scope::Favorites => {
            query.push(" AND e.is_favorite = 1");
        }
        Scope::Category(id) => {
            query.push(" AND f.category_id = ");
            query.push_bind(*id);
        }
        Scope::Feed(id) => {
            query.push(" AND e.feed_id = ");
            query.push_bind(*id);
        }
        Scope::Tag(id) => {
            query.push(" AND EXISTS (SELECT 1 FROM entry_tags et WHERE et.entry_id = e.id AND et.tag_id = ");
            query.push_bind(*id);
            query.push(")");
        }
    }
}

fn push_search(query: &mut QueryBuilder<'_, Sqlite>, search: &SearchQuery) {
    for word in &search.words {
        let pattern = like_pattern(word);
        query.push(" AND (e.title LIKE ");
        query.push_bind(pattern.clone());
        query.push(r" ESCAPE '\' OR e.content LIKE ");
        query.push_bind(pattern);
        query.push(r" ESCAPE '\')");
    }
    for (column, terms) in [
        ("e.title", &search.intitle),
        ("e.author", &search.author),
        ("e.link", &search.inurl),
    ] {
        for term in terms {
            query.push(format!(" AND {column} LIKE "));
            query.push_bind(like_pattern(term));
            query.push(r" ESCAPE '\'");
        }
    }
    for tag in &search.tags {
        query.push(
            " AND EXISTS (SELECT 1 FROM entry_tags et JOIN tags t ON t.id = et.tag_id \
             WHERE et.entry_id = e.id AND t.name = ",
        );
        query.push_bind(tag.clone());
        query.push(" COLLATE NOCASE)");
    }
}

/// Parse a stored datetime string.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
