//! Response DTOs for the web surface.

use serde::Serialize;

use crate::db::LogLine;
use crate::entry::{CategoryWithUnread, Entry};
use crate::listing::{Cursor, QueryContext};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    /// Response data.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
}

// ============================================================================
// Listing
// ============================================================================

/// Entry in a listing.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: i64,
    /// Feed ID.
    pub feed_id: i64,
    /// Feed title.
    pub feed_title: String,
    /// Entry title.
    pub title: String,
    /// Author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Link to the article.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Body.
    pub content: String,
    /// Published timestamp (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Read flag.
    pub is_read: bool,
    /// Favorite flag.
    pub is_favorite: bool,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            feed_id: entry.feed_id,
            feed_title: entry.feed_title,
            title: entry.title,
            author: entry.author,
            link: entry.link,
            content: entry.content,
            published_at: entry.published_at.map(|dt| dt.to_rfc3339()),
            is_read: entry.is_read,
            is_favorite: entry.is_favorite,
        }
    }
}

/// Category with unread count.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: i64,
    /// Name.
    pub name: String,
    /// Number of feeds.
    pub feed_count: i64,
    /// Unread entries.
    pub unread_count: i64,
}

impl From<CategoryWithUnread> for CategoryResponse {
    fn from(c: CategoryWithUnread) -> Self {
        Self {
            id: c.category.id,
            name: c.category.name,
            feed_count: c.feed_count,
            unread_count: c.unread_count,
        }
    }
}

/// The resolved listing parameters, echoed back to the client.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    /// Scope in `get` form.
    pub get: String,
    /// State mask bits.
    pub state: u8,
    /// Search string.
    pub search: String,
    /// Sort order.
    pub order: String,
    /// Page size.
    pub nb: u32,
    /// Cursor of this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<i64>,
}

impl From<&QueryContext> for ContextResponse {
    fn from(ctx: &QueryContext) -> Self {
        Self {
            get: ctx.scope.to_string(),
            state: ctx.state.bits(),
            search: ctx.search.clone(),
            order: ctx.order.to_string(),
            nb: ctx.page_size,
            next: ctx.cursor.and_then(Cursor::entry_id),
        }
    }
}

/// Metadata of the normal view.
#[derive(Debug, Serialize)]
pub struct ListingMeta {
    /// Cursor of the next page, absent on the last one.
    pub next_cursor: Option<i64>,
    /// Page title.
    pub title: String,
    /// Title of the matching RSS export.
    pub rss_title: String,
    /// Unread entries in the scope.
    pub unread: i64,
    /// Resolved parameters.
    pub context: ContextResponse,
    /// Categories with unread counts.
    pub categories: Vec<CategoryResponse>,
}

/// Normal view: one page of entries.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    /// Entries of the page.
    pub data: Vec<EntryResponse>,
    /// Page metadata.
    pub meta: ListingMeta,
}

/// Global view: categories overview.
#[derive(Debug, Serialize)]
pub struct GlobalResponse {
    /// Page title.
    pub title: String,
    /// Title of the matching RSS export.
    pub rss_title: String,
    /// Categories with unread counts.
    pub categories: Vec<CategoryResponse>,
}

// ============================================================================
// Misc
// ============================================================================

/// About page.
#[derive(Debug, Serialize)]
pub struct AboutResponse {
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Server version.
    pub version: String,
}

/// A user log line.
#[derive(Debug, Serialize)]
pub struct LogLineResponse {
    /// Line ID.
    pub id: i64,
    /// Severity.
    pub level: String,
    /// Message.
    pub message: String,
    /// Timestamp.
    pub created_at: String,
}

impl From<LogLine> for LogLineResponse {
    fn from(line: LogLine) -> Self {
        Self {
            id: line.id,
            level: line.level,
            message: line.message,
            created_at: line.created_at,
        }
    }
}
