//! Cursor pagination over an entry store.

use std::future::Future;

use super::{
    ContextResolver, Cursor, ListingError, QueryContext, RequestParams, Scope, SortOrder, StateMask,
    UserReadingConfig,
};
use crate::entry::Entry;
use crate::Result;

/// Criteria passed to [`EntryStore::list_where`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFilter<'a> {
    /// Entry selection.
    pub scope: Scope,
    /// States to include.
    pub state: StateMask,
    /// Listing order.
    pub order: SortOrder,
    /// Maximum number of entries to return.
    pub limit: u32,
    /// Start of the page; entries before it in `order` are skipped.
    pub cursor: Option<Cursor>,
    /// Free-text filter, empty for none.
    pub search: &'a str,
}

impl<'a> EntryFilter<'a> {
    /// Build the filter for a context with an explicit limit.
    pub fn from_context(ctx: &'a QueryContext, limit: u32) -> Self {
        Self {
            scope: ctx.scope,
            state: ctx.state,
            order: ctx.order,
            limit,
            cursor: ctx.cursor,
            search: &ctx.search,
        }
    }
}

/// Display name and unread count of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSummary {
    /// Human-readable name (category name, feed title, ...).
    pub name: String,
    /// Unread entries in the scope.
    pub unread: i64,
}

/// Entry persistence consumed by the lister.
pub trait EntryStore: Sync {
    /// Describe a scope for a user.
    ///
    /// Returns `None` when the category, feed or tag does not exist or
    /// belongs to another user.
    fn describe_scope(
        &self,
        user_id: i64,
        scope: &Scope,
    ) -> impl Future<Output = Result<Option<ScopeSummary>>> + Send;

    /// List at most `filter.limit` entries ordered by `filter.order`,
    /// starting at `filter.cursor`.
    fn list_where(
        &self,
        user_id: i64,
        filter: &EntryFilter<'_>,
    ) -> impl Future<Output = Result<Vec<Entry>>> + Send;
}

/// One page of entries.
#[derive(Debug, Clone)]
pub struct Page {
    /// Entries in listing order, at most `page_size` of them.
    pub entries: Vec<Entry>,
    /// Cursor for the following page, `None` on the last page.
    pub next_cursor: Option<i64>,
}

/// List one page for a resolved context.
///
/// One extra entry is requested: if it comes back it is dropped from the
/// page and its ID becomes the next cursor, so the following page starts
/// with it.
pub async fn list_page<S: EntryStore>(
    store: &S,
    user_id: i64,
    ctx: &QueryContext,
) -> std::result::Result<Page, ListingError> {
    let page_size = ctx.page_size as usize;
    let filter = EntryFilter::from_context(ctx, ctx.page_size.saturating_add(1));

    let mut entries = store
        .list_where(user_id, &filter)
        .await
        .map_err(ListingError::ListingFailed)?;

    let next_cursor = if entries.len() > page_size {
        entries.truncate(page_size + 1);
        entries.pop().map(|entry| entry.id)
    } else {
        None
    };

    Ok(Page {
        entries,
        next_cursor,
    })
}

/// List the entries of a context without trimming the look-ahead row.
///
/// Used by feed export, which has no use for a cursor.
pub async fn list_full<S: EntryStore>(
    store: &S,
    user_id: i64,
    ctx: &QueryContext,
) -> std::result::Result<Vec<Entry>, ListingError> {
    let filter = EntryFilter::from_context(ctx, ctx.page_size.saturating_add(1));
    store
        .list_where(user_id, &filter)
        .await
        .map_err(ListingError::ListingFailed)
}

/// A resolved listing request.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The query context.
    pub context: QueryContext,
    /// Name and unread count of the requested scope.
    pub summary: ScopeSummary,
}

/// Resolves request contexts and lists entries from one store.
pub struct EntryLister<'a, S: EntryStore> {
    store: &'a S,
    resolver: ContextResolver,
}

impl<'a, S: EntryStore> EntryLister<'a, S> {
    /// Create a lister over a store.
    pub fn new(store: &'a S, resolver: ContextResolver) -> Self {
        Self { store, resolver }
    }

    /// Resolve the context of a request for a user.
    ///
    /// Fails with [`ListingError::InvalidScope`] when the scope is
    /// malformed or unknown to the user.
    pub async fn resolve(
        &self,
        user_id: i64,
        params: &RequestParams,
        config: &UserReadingConfig,
    ) -> std::result::Result<Resolved, ListingError> {
        let scope = Scope::parse_param(params.get("get"))?;
        let summary = self
            .store
            .describe_scope(user_id, &scope)
            .await
            .map_err(ListingError::ListingFailed)?
            .ok_or_else(|| ListingError::InvalidScope(scope.to_string()))?;

        let context = self.resolver.resolve(params, config, summary.unread)?;
        Ok(Resolved { context, summary })
    }

    /// List one page for a context.
    pub async fn page(
        &self,
        user_id: i64,
        ctx: &QueryContext,
    ) -> std::result::Result<Page, ListingError> {
        list_page(self.store, user_id, ctx).await
    }

    /// List a context without trimming, for feed export.
    pub async fn full(
        &self,
        user_id: i64,
        ctx: &QueryContext,
    ) -> std::result::Result<Vec<Entry>, ListingError> {
        list_full(self.store, user_id, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedlistError;

    /// Store over a fixed vector; entry IDs are the ordering key.
    struct VecStore {
        entries: Vec<Entry>,
        fail: bool,
    }

    impl VecStore {
        fn with_ids(ids: impl IntoIterator<Item = i64>) -> Self {
            Self {
                entries: ids.into_iter().map(entry).collect(),
                fail: false,
            }
        }
    }

    fn entry(id: i64) -> Entry {
        Entry {
            id,
            feed_id: 1,
            feed_title: "Feed".to_string(),
            guid: format!("guid-{id}"),
            title: format!("Entry {id}"),
            author: None,
            link: None,
            content: String::new(),
            published_at: None,
            is_read: id % 2 == 0,
            is_favorite: false,
        }
    }

    impl EntryStore for VecStore {
        async fn describe_scope(&self, _user_id: i64, scope: &Scope) -> Result<Option<ScopeSummary>> {
            match scope {
                Scope::Category(99) => Ok(None),
                _ => Ok(Some(ScopeSummary {
                    name: "Main stream".to_string(),
                    unread: self.entries.iter().filter(|e| !e.is_read).count() as i64,
                })),
            }
        }

        async fn list_where(&self, _user_id: i64, filter: &EntryFilter<'_>) -> Result<Vec<Entry>> {
            if self.fail {
                return Err(FeedlistError::Database("disk I/O error".to_string()));
            }
            let mut selected: Vec<Entry> = self
                .entries
                .iter()
                .filter(|e| match filter.state.read_filter() {
                    Some(read) => e.is_read == read,
                    None => true,
                })
                .filter(|e| match (filter.cursor, filter.order) {
                    (None, _) => true,
                    (Some(Cursor::Unmatched), _) => false,
                    (Some(Cursor::At(c)), SortOrder::Asc) => e.id >= c,
                    (Some(Cursor::At(c)), SortOrder::Desc) => e.id <= c,
                })
                .cloned()
                .collect();
            selected.sort_by_key(|e| e.id);
            if filter.order == SortOrder::Desc {
                selected.reverse();
            }
            selected.truncate(filter.limit as usize);
            Ok(selected)
        }
    }

    fn context(page_size: u32, order: SortOrder) -> QueryContext {
        QueryContext {
            scope: Scope::All,
            state: StateMask::ALL,
            search: String::new(),
            order,
            page_size,
            cursor: None,
        }
    }

    fn ids(entries: &[Entry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn test_page_with_more_entries() {
        let store = VecStore::with_ids(1..=25);
        let page = list_page(&store, 1, &context(20, SortOrder::Desc)).await.unwrap();

        assert_eq!(page.entries.len(), 20);
        assert_eq!(page.entries[0].id, 25);
        assert_eq!(page.entries[19].id, 6);
        assert_eq!(page.next_cursor, Some(5));

        let mut ctx = context(20, SortOrder::Desc);
        ctx.cursor = page.next_cursor.map(Cursor::At);
        let rest = list_page(&store, 1, &ctx).await.unwrap();
        assert_eq!(ids(&rest.entries), vec![5, 4, 3, 2, 1]);
        assert_eq!(rest.next_cursor, None);
    }

    #[tokio::test]
    async fn test_last_page_has_no_cursor() {
        let store = VecStore::with_ids(1..=20);
        let page = list_page(&store, 1, &context(20, SortOrder::Desc)).await.unwrap();

        assert_eq!(page.entries.len(), 20);
        assert_eq!(page.next_cursor, None);

        let store = VecStore::with_ids(1..=3);
        let page = list_page(&store, 1, &context(20, SortOrder::Asc)).await.unwrap();
        assert_eq!(ids(&page.entries), vec![1, 2, 3]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_walking_cursors_covers_all_entries_once() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let store = VecStore::with_ids(1..=23);
            let mut ctx = context(5, order);
            let mut seen = Vec::new();

            loop {
                let page = list_page(&store, 1, &ctx).await.unwrap();
                assert!(page.entries.len() <= 5);
                seen.extend(ids(&page.entries));
                match page.next_cursor {
                    Some(next) => ctx.cursor = Some(Cursor::At(next)),
                    None => break,
                }
            }

            let mut expected: Vec<i64> = (1..=23).collect();
            if order == SortOrder::Desc {
                expected.reverse();
            }
            assert_eq!(seen, expected);
        }
    }

    #[tokio::test]
    async fn test_unmatched_cursor_lists_nothing() {
        let store = VecStore::with_ids(1..=5);
        let mut ctx = context(20, SortOrder::Asc);
        ctx.cursor = Some(Cursor::Unmatched);

        let page = list_page(&store, 1, &ctx).await.unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_full_listing_keeps_lookahead_row() {
        let store = VecStore::with_ids(1..=25);
        let entries = list_full(&store, 1, &context(20, SortOrder::Desc)).await.unwrap();

        assert_eq!(entries.len(), 21);
        assert_eq!(entries[20].id, 5);
    }

    #[tokio::test]
    async fn test_store_failure_is_listing_failed() {
        let store = VecStore {
            entries: vec![],
            fail: true,
        };
        let result = list_page(&store, 1, &context(10, SortOrder::Desc)).await;
        assert!(matches!(result, Err(ListingError::ListingFailed(_))));
    }

    #[tokio::test]
    async fn test_lister_resolves_with_scope_unread_count() {
        // Only even (read) entries: no unread left in scope.
        let store = VecStore::with_ids((1..=10).map(|i| i * 2));
        let lister = EntryLister::new(&store, ContextResolver::default());
        let config = UserReadingConfig {
            default_view_state: StateMask::UNREAD,
            default_sort_order: SortOrder::Desc,
            default_page_size: 4,
            access_token: String::new(),
        };

        let resolved = lister.resolve(1, &RequestParams::new(), &config).await.unwrap();
        assert_eq!(resolved.summary.unread, 0);
        assert_eq!(resolved.context.state, StateMask::ALL);

        let page = lister.page(1, &resolved.context).await.unwrap();
        assert_eq!(ids(&page.entries), vec![20, 18, 16, 14]);
        assert_eq!(page.next_cursor, Some(12));
    }

    #[tokio::test]
    async fn test_lister_rejects_unknown_scope() {
        let store = VecStore::with_ids(1..=3);
        let lister = EntryLister::new(&store, ContextResolver::default());
        let config = UserReadingConfig {
            default_view_state: StateMask::UNREAD,
            default_sort_order: SortOrder::Desc,
            default_page_size: 4,
            access_token: String::new(),
        };

        let params = RequestParams::new().with("get", "c/99");
        let result = lister.resolve(1, &params, &config).await;
        assert!(matches!(result, Err(ListingError::InvalidScope(ref s)) if s == "c/99"));
    }
}
