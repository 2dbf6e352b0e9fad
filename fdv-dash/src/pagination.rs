//! Pagination of normalized record tables (100 rows/page)

/// Rows per page
pub const PAGE_SIZE: i64 = 100;

/// Where a page sits in the table
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Total number of pages
    pub total_pages: i64,
    /// Index of the first row on the page
    pub offset: i64,
}

/// Clamp the requested page into `[1, total_pages]` and locate its first row
///
/// An empty table still reports page 1 (of 0).
///
/// # Examples
/// ```
/// use fdv_dash::pagination::calculate_pagination;
///
/// // 250 total results = 3 pages (100 + 100 + 50)
/// let p = calculate_pagination(250, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 100);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(250, 99);
/// assert_eq!(p.page, 3);  // Clamped to last page
/// assert_eq!(p.offset, 200);
/// ```
pub fn calculate_pagination(total_results: i64, requested_page: i64) -> Pagination {
    let total_pages = (total_results + PAGE_SIZE - 1) / PAGE_SIZE;
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Rows belonging to the page described by `pagination`
pub fn page_slice<T>(items: &[T], pagination: Pagination) -> &[T] {
    let start = usize::try_from(pagination.offset).unwrap_or(0).min(items.len());
    let end = start.saturating_add(PAGE_SIZE as usize).min(items.len());
    &items[start..end]
}
