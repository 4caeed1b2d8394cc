//! Offset pagination primitives shared by listing endpoints.
//!
//! Listings accept loosely-typed `page` and `limit` values from clients and
//! normalize them into a [`PageRequest`]. Once the backing store reports the
//! total row count, the request is combined with the items into a
//! [`Paginated`] envelope:
//!
//! ```json
//! {"data": [...], "meta": {"total": 42, "page": 2, "limit": 10, "totalPages": 5}}
//! ```

use serde::{Deserialize, Serialize};

/// Page number used when the client omits the page or sends one below 1.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits the limit or sends one out of range.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// A normalized page selection.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::normalized(Some(0), Some(500));
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from raw client values.
    ///
    /// Pages below 1 fall back to [`DEFAULT_PAGE`]; limits outside
    /// `1..=MAX_LIMIT` fall back to [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn normalized(page: Option<i64>, limit: Option<i64>) -> Self {
        let page_number = page
            .filter(|value| *value >= 1)
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(DEFAULT_PAGE);
        let page_size = limit
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| (1..=MAX_LIMIT).contains(value))
            .unwrap_or(DEFAULT_LIMIT);
        Self {
            page: page_number,
            limit: page_size,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.limit))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of items across all pages.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Number of pages needed to cover `total` at this `limit`.
    pub total_pages: u64,
}

impl PageMeta {
    /// Compute metadata for `request` given the store's `total` count.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageMeta, PageRequest};
    ///
    /// let meta = PageMeta::new(PageRequest::normalized(Some(1), Some(10)), 21);
    /// assert_eq!(meta.total_pages, 3);
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page(),
            limit: request.limit(),
            total_pages: total.div_ceil(u64::from(request.limit())),
        }
    }
}

/// A page of items together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the current page.
    pub data: Vec<T>,
    /// Metadata describing the page and the full result set.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap `data` with metadata derived from `request` and `total`.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }

    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for request normalization and page arithmetic.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some(0), Some(0), 1, 10)]
    #[case(Some(-3), Some(101), 1, 10)]
    #[case(Some(4), Some(100), 4, 100)]
    #[case(Some(2), Some(1), 2, 1)]
    #[case(Some(i64::MAX), Some(-1), 1, 10)]
    fn normalizes_raw_values(
        #[case] page: Option<i64>,
        #[case] limit: Option<i64>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::normalized(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(3, 10, 20)]
    #[case(2, 25, 25)]
    fn offset_skips_previous_pages(#[case] page: i64, #[case] limit: i64, #[case] offset: u64) {
        assert_eq!(
            PageRequest::normalized(Some(page), Some(limit)).offset(),
            offset
        );
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(250, 100, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] limit: i64, #[case] pages: u64) {
        let meta = PageMeta::new(PageRequest::normalized(None, Some(limit)), total);
        assert_eq!(meta.total_pages, pages);
    }

    #[rstest]
    fn envelope_serializes_camel_case_meta() {
        let page = Paginated::new(vec!["a", "b"], PageRequest::default(), 2);
        let value = serde_json::to_value(&page).expect("serialize envelope");
        assert_eq!(
            value,
            serde_json::json!({
                "data": ["a", "b"],
                "meta": {"total": 2, "page": 1, "limit": 10, "totalPages": 1}
            })
        );
    }

    #[rstest]
    fn map_preserves_meta() {
        let page = Paginated::new(vec![1_u8, 2], PageRequest::normalized(Some(2), Some(2)), 4);
        let mapped = page.map(|value| value.to_string());
        assert_eq!(mapped.data, vec!["1".to_owned(), "2".to_owned()]);
        assert_eq!(mapped.meta.page, 2);
        assert_eq!(mapped.meta.total_pages, 2);
    }
}
