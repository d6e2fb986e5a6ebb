//! feedlist - a self-hosted feed reader's entry views.
//!
//! Resolves listing requests against each user's reading preferences and
//! serves cursor-paginated entry pages and RSS exports over HTTP.

pub mod config;
pub mod db;
pub mod entry;
pub mod error;
pub mod listing;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use entry::{Entry, EntryRepository, NewEntry};
pub use error::{FeedlistError, Result};
pub use listing::{
    list_full, list_page, resolve_context, Cursor, EntryLister, EntryStore, ListingError, Page,
    QueryContext, RequestParams, Scope, SortOrder, StateMask, UserReadingConfig,
};
pub use web::WebServer;
