//! Offset-based pagination for database queries.

use serde::{Deserialize, Serialize};

/// Maximum number of items per page.
pub const MAX_LIMIT: i64 = 100;

/// Default number of items per page.
pub const DEFAULT_LIMIT: i64 = 25;

/// Offset-based pagination parameters for database queries.
///
/// All listing queries take a [`Pagination`] to keep result sets bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance with clamped bounds.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_LIMIT);
        Self::new(page_size, (page - 1) * page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit_and_offset() {
        let pagination = Pagination::new(10_000, -5);
        assert_eq!(pagination.limit, MAX_LIMIT);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn page_math() {
        let pagination = Pagination::from_page(3, 25);
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 50);

        // Page numbers below 1 are treated as the first page.
        let first = Pagination::from_page(0, 25);
        assert_eq!(first.offset, 0);
    }
}
