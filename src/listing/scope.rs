//! Entry selection scope.

use std::fmt;

use super::ListingError;

/// Which entries a listing selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every entry of every feed.
    #[default]
    All,
    /// Entries marked as favorite.
    Favorites,
    /// Entries of the feeds in a category.
    Category(i64),
    /// Entries of a single feed.
    Feed(i64),
    /// Entries carrying a tag.
    Tag(i64),
}

impl Scope {
    /// Parse the `get` request parameter.
    ///
    /// Accepted forms are `a`, `s`, `c/<id>`, `f/<id>` and `t/<id>`. The
    /// legacy `_` separator (`c_3`) is accepted too. An absent or empty
    /// parameter selects [`Scope::All`].
    pub fn parse_param(raw: Option<&str>) -> Result<Self, ListingError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Scope::All),
            Some(value) => Self::parse(value),
        }
    }

    /// Parse a non-empty scope string.
    pub fn parse(value: &str) -> Result<Self, ListingError> {
        let invalid = || ListingError::InvalidScope(value.to_string());

        let (kind, id) = match value.find(['/', '_']) {
            Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
            None => (value, None),
        };

        let parse_id = |id: Option<&str>| -> Result<i64, ListingError> {
            id.and_then(|s| s.parse::<i64>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(invalid)
        };

        match kind {
            "a" if id.is_none() => Ok(Scope::All),
            "s" if id.is_none() => Ok(Scope::Favorites),
            "c" => parse_id(id).map(Scope::Category),
            "f" => parse_id(id).map(Scope::Feed),
            "t" => parse_id(id).map(Scope::Tag),
            _ => Err(invalid()),
        }
    }

    /// Kind letter used in the `get` parameter.
    pub fn kind(&self) -> &'static str {
        match self {
            Scope::All => "a",
            Scope::Favorites => "s",
            Scope::Category(_) => "c",
            Scope::Feed(_) => "f",
            Scope::Tag(_) => "t",
        }
    }

    /// Identifier carried by the scope, if any.
    pub fn id(&self) -> Option<i64> {
        match self {
            Scope::All | Scope::Favorites => None,
            Scope::Category(id) | Scope::Feed(id) | Scope::Tag(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}/{}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}
