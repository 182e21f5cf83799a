use serde::{Deserialize, Serialize};

/// Pagination envelope for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    /// Maximum entries per page.
    pub limit: usize,
    /// Total entries across all pages.
    pub total: usize,
    /// Total number of pages: `ceil(total / limit)`.
    pub pages: usize,
}

impl Pagination {
    /// Build the envelope for a page over `total` entries.
    ///
    /// A `limit` of 0 is treated as 1 to keep the page count defined.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total,
            pages: total.div_ceil(limit),
        }
    }

    /// Offset of the first entry on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}
