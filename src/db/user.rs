//! User model for feedlist.
//!
//! A user owns categories, feeds and tags, and carries the reading
//! preferences used when a request leaves a listing parameter out.

use std::fmt;
use std::str::FromStr;

use crate::listing::{SortOrder, StateMask, UserReadingConfig};

/// Preferred entry view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Paged list of entries.
    #[default]
    Normal,
    /// Overview of categories and feeds with unread counts.
    Global,
}

impl ViewMode {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Normal => "normal",
            ViewMode::Global => "global",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(ViewMode::Normal),
            "global" => Ok(ViewMode::Global),
            _ => Err(format!("unknown view mode: {s}")),
        }
    }
}

/// User entity.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Username (unique, case-insensitive).
    pub username: String,
    /// Default state mask applied when `state` is absent.
    pub default_view_state: StateMask,
    /// Default sort order applied when `order` is absent.
    pub sort_order: SortOrder,
    /// Default page size applied when `nb` is absent or invalid.
    pub posts_per_page: u32,
    /// Preferred view.
    pub view_mode: ViewMode,
    /// Token granting anonymous access to the RSS export. Empty disables it.
    pub feed_token: String,
    /// Account creation timestamp.
    pub created_at: String,
}

impl User {
    /// Read-only view of the preferences consumed by context resolution.
    pub fn reading_config(&self) -> UserReadingConfig {
        UserReadingConfig {
            default_view_state: self.default_view_state,
            default_sort_order: self.sort_order,
            default_page_size: self.posts_per_page,
            access_token: self.feed_token.clone(),
        }
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Username.
    pub username: String,
    /// Default state mask.
    pub default_view_state: StateMask,
    /// Default sort order.
    pub sort_order: SortOrder,
    /// Default page size.
    pub posts_per_page: u32,
    /// Preferred view.
    pub view_mode: ViewMode,
    /// Feed token (empty disables token access).
    pub feed_token: String,
}

impl NewUser {
    /// Create a new user with default preferences.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            default_view_state: StateMask::UNREAD,
            sort_order: SortOrder::Desc,
            posts_per_page: 20,
            view_mode: ViewMode::Normal,
            feed_token: String::new(),
        }
    }

    /// Seed the preferences from the configured reading defaults.
    pub fn with_defaults(mut self, reading: &crate::config::ReadingConfig) -> Self {
        if let Some(mask) = StateMask::from_bits(reading.default_view_state) {
            self.default_view_state = mask;
        }
        if let Some(order) = SortOrder::parse(&reading.sort_order) {
            self.sort_order = order;
        }
        if reading.posts_per_page > 0 {
            self.posts_per_page = reading.posts_per_page;
        }
        if let Ok(mode) = reading.view_mode.parse() {
            self.view_mode = mode;
        }
        self
    }

    /// Set the default state mask.
    pub fn with_view_state(mut self, mask: StateMask) -> Self {
        self.default_view_state = mask;
        self
    }

    /// Set the default sort order.
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Set the default page size.
    pub fn with_posts_per_page(mut self, posts_per_page: u32) -> Self {
        self.posts_per_page = posts_per_page;
        self
    }

    /// Set the preferred view.
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    /// Set the feed token.
    pub fn with_feed_token(mut self, token: impl Into<String>) -> Self {
        self.feed_token = token.into();
        self
    }
}

/// Partial update of reading preferences.
#[derive(Debug, Clone, Default)]
pub struct UserReadingUpdate {
    /// New default state mask.
    pub default_view_state: Option<StateMask>,
    /// New default sort order.
    pub sort_order: Option<SortOrder>,
    /// New default page size.
    pub posts_per_page: Option<u32>,
    /// New preferred view.
    pub view_mode: Option<ViewMode>,
}

impl UserReadingUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the update is empty.
    pub fn is_empty(&self) -> bool {
        self.default_view_state.is_none()
            && self.sort_order.is_none()
            && self.posts_per_page.is_none()
            && self.view_mode.is_none()
    }
}
