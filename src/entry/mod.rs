//! Entry persistence for feedlist.
//!
//! Categories, feeds, tags and entries of each user, and the
//! [`EntryStore`](crate::listing::EntryStore) implementation the listing
//! core reads through.

pub mod repository;
pub mod search;
pub mod types;

pub use repository::{EntryRepository, ALL_SCOPE_NAME, FAVORITES_SCOPE_NAME};
pub use search::{like_pattern, SearchQuery, MAX_QUERY_LENGTH};
pub use types::{Category, CategoryWithUnread, Entry, Feed, NewEntry, Tag};
