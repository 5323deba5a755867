//! Page-based pagination for the activity log.

use serde::{Deserialize, Serialize};

/// Entries per page when the client does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 200;
/// Highest page number accepted. Keeps every offset within `i64`.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

/// A 1-based page and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u64,
    /// Entries per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Build a request, pulling out-of-range values back into range.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Entries to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Entries on a full page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Number of pages needed for `total` entries (at least one).
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size).max(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the numbers a client needs to navigate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T: Serialize> {
    /// Entries on this page.
    pub items: Vec<T>,
    /// This page's number.
    pub page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Entries across every page.
    pub total_items: u64,
    /// Pages across every entry.
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_previous: bool,
}

impl<T: Serialize> PageResponse<T> {
    /// Wrap the `items` fetched for `request` out of `total_items` matches.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let total_pages = request.page_count(total_items);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_clamped() {
        let req = PageRequest::new(0, 10_000);
        assert_eq!(req, PageRequest::new(1, MAX_PAGE_SIZE));
        assert_eq!(req.offset(), 0);
        assert_eq!(PageRequest::new(1, 0).page_size, 1);
    }

    #[test]
    fn test_huge_page_offset_fits_in_i64() {
        let req = PageRequest::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(req.page, MAX_PAGE);
        assert!(i64::try_from(req.offset()).is_ok());
    }

    #[test]
    fn test_offset_for_later_pages() {
        let req = PageRequest::new(3, 20);
        assert_eq!(req.offset(), 40);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn test_response_navigation() {
        let resp = PageResponse::new(vec![4, 5, 6], &PageRequest::new(2, 3), 7);
        assert_eq!(resp.total_pages, 3);
        assert!(resp.has_next);
        assert!(resp.has_previous);

        let empty: PageResponse<u8> = PageResponse::new(Vec::new(), &PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 1);
        assert_eq!(empty.page_size, DEFAULT_PAGE_SIZE);
        assert!(!empty.has_next);
        assert!(!empty.has_previous);
    }
}
