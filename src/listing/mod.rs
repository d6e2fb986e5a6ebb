//! Entry listing.
//!
//! Resolves a request into a [`QueryContext`] and lists one page of
//! entries for it through an [`EntryStore`].
//!
//! ```text
//! params + UserReadingConfig ──resolve──▶ QueryContext ──list_page──▶ Page
//!                                   ▲                        │
//!                     unread count ─┘                        ▼
//!                                                   EntryStore::list_where
//! ```

mod context;
mod pager;
mod scope;
mod state;

pub use context::{
    resolve_context, ContextResolver, Cursor, QueryContext, RequestParams, UserReadingConfig,
    MAX_PAGE_SIZE,
};
pub use pager::{
    list_full, list_page, EntryFilter, EntryLister, EntryStore, Page, Resolved, ScopeSummary,
};
pub use scope::Scope;
pub use state::{SortOrder, StateMask};

use thiserror::Error;

use crate::FeedlistError;

/// Errors raised while resolving or listing entries.
#[derive(Error, Debug)]
pub enum ListingError {
    /// The `get` parameter does not name a known scope.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// The `state` parameter is not a valid state mask.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The entry store failed.
    #[error("listing failed: {0}")]
    ListingFailed(#[source] FeedlistError),

    /// Neither a session nor a valid feed token was presented.
    #[error("access denied")]
    AccessDenied,
}

impl ListingError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ListingError::ListingFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ListingError::InvalidScope("a/".to_string()).to_string(),
            "invalid scope: a/"
        );
        assert_eq!(ListingError::AccessDenied.to_string(), "access denied");

        let err = ListingError::ListingFailed(FeedlistError::Database("locked".to_string()));
        assert!(err.to_string().starts_with("listing failed"));
        assert!(!err.is_client_error());
        assert!(ListingError::InvalidState("x".to_string()).is_client_error());
    }
}
