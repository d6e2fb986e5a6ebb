//! Query context resolution.
//!
//! A [`QueryContext`] is built per request from the request parameters and
//! the user's reading preferences, then dropped with the response.

use std::collections::HashMap;

use super::{ListingError, Scope, SortOrder, StateMask};

/// Hard upper bound for the page size.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Where a page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// The page starts with this entry ID.
    At(i64),
    /// A `next` value that names no entry; the page is empty.
    Unmatched,
}

impl Cursor {
    /// Parse the `next` request parameter. Empty means the first page.
    pub fn parse_param(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .map_or(Cursor::Unmatched, Cursor::At),
            ),
        }
    }

    /// Entry ID the page starts with, if any.
    pub fn entry_id(self) -> Option<i64> {
        match self {
            Cursor::At(id) => Some(id),
            Cursor::Unmatched => None,
        }
    }
}

/// Request parameters consumed by context resolution.
///
/// Absence of a key is distinct from an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(HashMap<String, String>);

impl RequestParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check whether a parameter was supplied, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The user's persisted reading preferences, read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReadingConfig {
    /// State mask used when `state` is absent.
    pub default_view_state: StateMask,
    /// Sort order used when `order` is absent or unknown.
    pub default_sort_order: SortOrder,
    /// Page size used when `nb` is absent or invalid.
    pub default_page_size: u32,
    /// Token granting anonymous feed access. Empty disables it.
    pub access_token: String,
}

/// Immutable description of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Entry selection.
    pub scope: Scope,
    /// States to include.
    pub state: StateMask,
    /// Free-text filter, empty for none.
    pub search: String,
    /// Listing order.
    pub order: SortOrder,
    /// Entries per page, at least 1.
    pub page_size: u32,
    /// Start of the page, `None` for the first page.
    pub cursor: Option<Cursor>,
}

/// Turns request parameters into a [`QueryContext`].
#[derive(Debug, Clone, Copy)]
pub struct ContextResolver {
    max_page_size: u32,
}

impl Default for ContextResolver {
    fn default() -> Self {
        Self {
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ContextResolver {
    /// Create a resolver clamping page sizes to `max_page_size`.
    pub fn new(max_page_size: u32) -> Self {
        Self {
            max_page_size: max_page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Resolve the context of a listing request.
    ///
    /// `unread_count` is the number of unread entries in the requested
    /// scope. When the state mask comes from the user's defaults, includes
    /// unread, and `unread_count` is zero or negative, read entries are
    /// added so the page is not empty.
    pub fn resolve(
        &self,
        params: &RequestParams,
        config: &UserReadingConfig,
        unread_count: i64,
    ) -> Result<QueryContext, ListingError> {
        let scope = Scope::parse_param(params.get("get"))?;

        let state_forced = params.contains("state");
        let mut state = match params.get("state").map(str::trim) {
            Some(raw) if !raw.is_empty() => StateMask::parse(raw)?,
            _ => config.default_view_state,
        };
        // Negative counts are treated like zero. A richer status model
        // would need to tell "none unread" from "not computed" here.
        if state.contains(StateMask::UNREAD) && !state_forced && unread_count <= 0 {
            state |= StateMask::READ;
        }

        let search = params.get("search").unwrap_or("").trim().to_string();

        let order = params
            .get("order")
            .and_then(SortOrder::parse)
            .unwrap_or(config.default_sort_order);

        let page_size = params
            .get("nb")
            .and_then(|nb| nb.trim().parse::<u32>().ok())
            .filter(|nb| *nb > 0)
            .unwrap_or(config.default_page_size)
            .clamp(1, self.max_page_size);

        let cursor = Cursor::parse_param(params.get("next"));

        Ok(QueryContext {
            scope,
            state,
            search,
            order,
            page_size,
            cursor,
        })
    }
}

/// Resolve a context with the default page size bound.
pub fn resolve_context(
    params: &RequestParams,
    config: &UserReadingConfig,
    unread_count: i64,
) -> Result<QueryContext, ListingError> {
    ContextResolver::default().resolve(params, config, unread_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UserReadingConfig {
        UserReadingConfig {
            default_view_state: StateMask::UNREAD,
            default_sort_order: SortOrder::Desc,
            default_page_size: 20,
            access_token: String::new(),
        }
    }

    #[test]
    fn test_defaults_from_config() {
        let ctx = resolve_context(&RequestParams::new(), &config(), 5).unwrap();

        assert_eq!(ctx.scope, Scope::All);
        assert_eq!(ctx.state, StateMask::UNREAD);
        assert_eq!(ctx.search, "");
        assert_eq!(ctx.order, SortOrder::Desc);
        assert_eq!(ctx.page_size, 20);
        assert_eq!(ctx.cursor, None);
    }

    #[test]
    fn test_parameters_override_config() {
        let params = RequestParams::new()
            .with("get", "f/4")
            .with("state", "5")
            .with("search", "  rust  ")
            .with("order", "ASC")
            .with("nb", "7")
            .with("next", "120");

        let ctx = resolve_context(&params, &config(), 5).unwrap();

        assert_eq!(ctx.scope, Scope::Feed(4));
        assert_eq!(ctx.state, StateMask::READ | StateMask::FAVORITE);
        assert_eq!(ctx.search, "rust");
        assert_eq!(ctx.order, SortOrder::Asc);
        assert_eq!(ctx.page_size, 7);
        assert_eq!(ctx.cursor, Some(Cursor::At(120)));
    }

    #[test]
    fn test_category_scenario() {
        let params = RequestParams::new().with("get", "c/3").with("nb", "20");
        let ctx = resolve_context(&params, &config(), 5).unwrap();

        assert_eq!(ctx.scope, Scope::Category(3));
        assert_eq!(ctx.state, StateMask::UNREAD);
        assert_eq!(ctx.page_size, 20);
        assert_eq!(ctx.cursor, None);
    }

    #[test]
    fn test_unread_fallback_widens_default_mask() {
        let ctx = resolve_context(&RequestParams::new(), &config(), 0).unwrap();
        assert_eq!(ctx.state, StateMask::READ | StateMask::UNREAD);

        let ctx = resolve_context(&RequestParams::new(), &config(), -1).unwrap();
        assert_eq!(ctx.state, StateMask::ALL);
    }

    #[test]
    fn test_unread_fallback_skipped_when_state_given() {
        let params = RequestParams::new().with("state", "2");
        let ctx = resolve_context(&params, &config(), 0).unwrap();
        assert_eq!(ctx.state, StateMask::UNREAD);

        // An empty value still counts as an explicit choice.
        let params = RequestParams::new().with("state", "");
        let ctx = resolve_context(&params, &config(), 0).unwrap();
        assert_eq!(ctx.state, StateMask::UNREAD);
    }

    #[test]
    fn test_unread_fallback_needs_unread_in_mask() {
        let mut cfg = config();
        cfg.default_view_state = StateMask::FAVORITE;
        let ctx = resolve_context(&RequestParams::new(), &cfg, 0).unwrap();
        assert_eq!(ctx.state, StateMask::FAVORITE);
    }

    #[test]
    fn test_invalid_page_size_uses_default() {
        for nb in ["0", "-3", "abc", ""] {
            let params = RequestParams::new().with("nb", nb);
            let ctx = resolve_context(&params, &config(), 5).unwrap();
            assert_eq!(ctx.page_size, 20, "nb={nb:?}");
        }
    }

    #[test]
    fn test_page_size_clamped() {
        let params = RequestParams::new().with("nb", "100000");
        let ctx = resolve_context(&params, &config(), 5).unwrap();
        assert_eq!(ctx.page_size, MAX_PAGE_SIZE);

        let ctx = ContextResolver::new(50).resolve(&params, &config(), 5).unwrap();
        assert_eq!(ctx.page_size, 50);

        let mut cfg = config();
        cfg.default_page_size = 0;
        let ctx = resolve_context(&RequestParams::new(), &cfg, 5).unwrap();
        assert_eq!(ctx.page_size, 1);
    }

    #[test]
    fn test_unknown_order_uses_default() {
        let params = RequestParams::new().with("order", "newest");
        let ctx = resolve_context(&params, &config(), 5).unwrap();
        assert_eq!(ctx.order, SortOrder::Desc);
    }

    #[test]
    fn test_invalid_scope() {
        let params = RequestParams::new().with("get", "a/");
        let result = resolve_context(&params, &config(), 5);
        assert!(matches!(result, Err(ListingError::InvalidScope(_))));
    }

    #[test]
    fn test_invalid_state() {
        let params = RequestParams::new().with("state", "64");
        let result = resolve_context(&params, &config(), 5);
        assert!(matches!(result, Err(ListingError::InvalidState(_))));
    }

    #[test]
    fn test_cursor_parsing() {
        let params = RequestParams::new().with("next", "");
        assert_eq!(resolve_context(&params, &config(), 5).unwrap().cursor, None);

        for raw in ["abc", "0", "-3"] {
            let params = RequestParams::new().with("next", raw);
            let ctx = resolve_context(&params, &config(), 5).unwrap();
            assert_eq!(ctx.cursor, Some(Cursor::Unmatched), "next={raw}");
            assert_eq!(ctx.cursor.and_then(Cursor::entry_id), None);
        }

        let params = RequestParams::new().with("next", " 42 ");
        let ctx = resolve_context(&params, &config(), 5).unwrap();
        assert_eq!(ctx.cursor.and_then(Cursor::entry_id), Some(42));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let params: RequestParams = [("get", "t/2"), ("nb", "3"), ("search", "x")]
            .into_iter()
            .collect();

        let first = resolve_context(&params, &config(), 0).unwrap();
        let second = resolve_context(&params, &config(), 0).unwrap();
        assert_eq!(first, second);
    }
}
