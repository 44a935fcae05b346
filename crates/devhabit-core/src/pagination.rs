//! Pagination types for list operations.

use crate::LinkDto;
use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// The default page number.
    pub const DEFAULT_PAGE: u32 = 1;
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a new page request, clamping both values into range.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, Self::MAX_SIZE),
        }
    }

    /// Creates a page request from optional query values.
    #[must_use]
    pub fn from_query(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self::new(
            page.unwrap_or(Self::DEFAULT_PAGE),
            page_size.unwrap_or(Self::DEFAULT_SIZE),
        )
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_SIZE)
    }
}

/// Envelope around one page of a list response.
///
/// The derived fields are computed once in [`PaginationResult::new`] and the
/// value is not mutated afterwards, apart from attaching links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDto>>,
}

impl<T> PaginationResult<T> {
    /// Wraps a page of items.
    ///
    /// `total_count` must come from the filtered query before `LIMIT/OFFSET`.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        let page_size = u64::from(request.page_size);
        let total_pages = if page_size > 0 {
            total_count.div_ceil(page_size)
        } else {
            0
        };

        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_count,
            total_pages,
            has_previous_page: request.page > 1,
            has_next_page: u64::from(request.page) < total_pages,
            links: None,
        }
    }

    /// Replaces the items with their response representation, keeping the
    /// page metadata.
    #[must_use]
    pub fn with_items<U>(self, items: Vec<U>) -> PaginationResult<U> {
        PaginationResult {
            items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
            links: self.links,
        }
    }

    /// Attaches collection links.
    #[must_use]
    pub fn with_links(mut self, links: Vec<LinkDto>) -> Self {
        self.links = Some(links);
        self
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
