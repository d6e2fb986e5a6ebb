//! Entry types for feedlist.

use chrono::{DateTime, Utc};

/// A feed entry as listed to a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry ID, also the listing order key.
    pub id: i64,
    /// Feed the entry belongs to.
    pub feed_id: i64,
    /// Title of that feed.
    pub feed_title: String,
    /// Unique ID within the feed.
    pub guid: String,
    /// Entry title.
    pub title: String,
    /// Author name.
    pub author: Option<String>,
    /// Link to the original article.
    pub link: Option<String>,
    /// Entry body (HTML).
    pub content: String,
    /// Publication date.
    pub published_at: Option<DateTime<Utc>>,
    /// Whether the entry was read.
    pub is_read: bool,
    /// Whether the entry is a favorite.
    pub is_favorite: bool,
}

/// New entry for insertion.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Feed ID.
    pub feed_id: i64,
    /// Unique ID within the feed.
    pub guid: String,
    /// Entry title.
    pub title: String,
    /// Author name.
    pub author: Option<String>,
    /// Link to the original article.
    pub link: Option<String>,
    /// Entry body.
    pub content: String,
    /// Publication date.
    pub published_at: Option<DateTime<Utc>>,
    /// Initial read flag.
    pub is_read: bool,
    /// Initial favorite flag.
    pub is_favorite: bool,
}

impl NewEntry {
    /// Create a new unread entry.
    pub fn new(feed_id: i64, guid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            feed_id,
            guid: guid.into(),
            title: title.into(),
            author: None,
            link: None,
            content: String::new(),
            published_at: None,
            is_read: false,
            is_favorite: false,
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the publication date.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Mark as read.
    pub fn read(mut self) -> Self {
        self.is_read = true;
        self
    }

    /// Mark as favorite.
    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }
}

/// A category of feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category ID.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Category name.
    pub name: String,
}

/// A category with its unread count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithUnread {
    /// The category.
    pub category: Category,
    /// Number of feeds in it.
    pub feed_count: i64,
    /// Unread entries across its feeds.
    pub unread_count: i64,
}

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed ID.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Category the feed is filed under.
    pub category_id: i64,
    /// Feed URL.
    pub url: String,
    /// Feed title.
    pub title: String,
    /// Site URL.
    pub site_url: Option<String>,
}

/// A user-defined entry tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag ID.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Tag name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_builder() {
        let entry = NewEntry::new(3, "urn:1", "Hello")
            .with_author("Ann")
            .with_link("https://example.com/1")
            .with_content("<p>body</p>")
            .read()
            .favorite();

        assert_eq!(entry.feed_id, 3);
        assert_eq!(entry.author.as_deref(), Some("Ann"));
        assert_eq!(entry.content, "<p>body</p>");
        assert!(entry.is_read);
        assert!(entry.is_favorite);
        assert!(entry.published_at.is_none());
    }
}
