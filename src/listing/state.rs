//! Entry state mask and sort order.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::ListingError;

/// Set of entry states a listing includes.
///
/// Read and unread select on the read flag: with only one of them set the
/// listing is restricted to it, with both (or neither) it is not. Favorite
/// restricts the listing to favorite entries.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateMask(u8);

impl StateMask {
    /// Entries already read.
    pub const READ: StateMask = StateMask(1);
    /// Entries not yet read.
    pub const UNREAD: StateMask = StateMask(2);
    /// Entries marked as favorite.
    pub const FAVORITE: StateMask = StateMask(4);
    /// Read and unread entries.
    pub const ALL: StateMask = StateMask(1 | 2);

    const KNOWN: u8 = 1 | 2 | 4;

    /// Build a mask from raw bits.
    ///
    /// Returns `None` for an empty mask or unknown bits.
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits == 0 || bits & !Self::KNOWN != 0 {
            None
        } else {
            Some(StateMask(bits))
        }
    }

    /// Parse the `state` request parameter (a decimal bitset literal).
    pub fn parse(raw: &str) -> Result<Self, ListingError> {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_bits)
            .ok_or_else(|| ListingError::InvalidState(raw.to_string()))
    }

    /// Raw bits.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Check whether every state of `other` is in this mask.
    pub fn contains(&self, other: StateMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Required value of the read flag, or `None` when both are accepted.
    pub fn read_filter(&self) -> Option<bool> {
        match (self.contains(Self::READ), self.contains(Self::UNREAD)) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    /// Whether only favorite entries are listed.
    pub fn favorites_only(&self) -> bool {
        self.contains(Self::FAVORITE)
    }
}

impl BitOr for StateMask {
    type Output = StateMask;

    fn bitor(self, rhs: StateMask) -> StateMask {
        StateMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for StateMask {
    fn bitor_assign(&mut self, rhs: StateMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StateMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::READ) {
            names.push("READ");
        }
        if self.contains(Self::UNREAD) {
            names.push("UNREAD");
        }
        if self.contains(Self::FAVORITE) {
            names.push("FAVORITE");
        }
        write!(f, "StateMask({})", names.join(" | "))
    }
}

/// Listing order over the entry ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Parse `asc`/`desc`, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Lowercase name, as stored and accepted.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// SQL keyword.
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        assert_eq!(StateMask::from_bits(2), Some(StateMask::UNREAD));
        assert_eq!(StateMask::from_bits(7).map(|m| m.bits()), Some(7));
        assert_eq!(StateMask::from_bits(0), None);
        assert_eq!(StateMask::from_bits(8), None);
        assert_eq!(StateMask::from_bits(10), None);
    }

    #[test]
    fn test_parse_state_param() {
        assert_eq!(StateMask::parse("3").unwrap(), StateMask::ALL);
        assert_eq!(StateMask::parse(" 4 ").unwrap(), StateMask::FAVORITE);

        for raw in ["", "0", "16", "-1", "read", "2.5", "300"] {
            assert!(
                matches!(StateMask::parse(raw), Err(ListingError::InvalidState(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_combine_and_contains() {
        let mut mask = StateMask::UNREAD;
        assert!(!mask.contains(StateMask::READ));

        mask |= StateMask::READ;
        assert!(mask.contains(StateMask::READ));
        assert!(mask.contains(StateMask::UNREAD));
        assert_eq!(mask, StateMask::ALL);
        assert_eq!(StateMask::READ | StateMask::FAVORITE, StateMask::from_bits(5).unwrap());
    }

    #[test]
    fn test_read_filter() {
        assert_eq!(StateMask::READ.read_filter(), Some(true));
        assert_eq!(StateMask::UNREAD.read_filter(), Some(false));
        assert_eq!(StateMask::ALL.read_filter(), None);
        assert_eq!(StateMask::FAVORITE.read_filter(), None);
        assert_eq!((StateMask::UNREAD | StateMask::FAVORITE).read_filter(), Some(false));
        assert!((StateMask::UNREAD | StateMask::FAVORITE).favorites_only());
        assert!(!StateMask::ALL.favorites_only());
    }

    #[test]
    fn test_debug_lists_states() {
        let mask = StateMask::READ | StateMask::FAVORITE;
        assert_eq!(format!("{mask:?}"), "StateMask(READ | FAVORITE)");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::parse("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::parse("random"), None);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.sql(), "ASC");
    }
}
