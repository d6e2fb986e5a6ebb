//! Request DTOs for the web surface.
//!
//! Listing routes take their query string as a raw map so that a key
//! given with an empty value stays distinguishable from an absent one.

use serde::Deserialize;

/// Log lines per page of `GET /logs`.
pub const LOG_LINES_PER_PAGE: u32 = 50;

/// Query of `GET /logs`.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
}

impl LogsQuery {
    /// Page number, at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Convert to (offset, limit).
    pub fn to_offset_limit(&self) -> (u32, u32) {
        let offset = (self.page() - 1).saturating_mul(LOG_LINES_PER_PAGE);
        (offset, LOG_LINES_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_query_offsets() {
        assert_eq!(LogsQuery::default().to_offset_limit(), (0, 50));
        assert_eq!(LogsQuery { page: Some(0) }.to_offset_limit(), (0, 50));
        assert_eq!(LogsQuery { page: Some(3) }.to_offset_limit(), (100, 50));
    }
}
