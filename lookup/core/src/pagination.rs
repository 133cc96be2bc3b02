//! Client-side pagination over an already-fetched list.
//!
//! Navigation never re-fetches; it only moves a window over the full list.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page over a list of known length
///
/// Deserializing rejects a zero page size or page number, the same values
/// [`Pagination::new`] and [`Pagination::go_to`] never produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPagination")]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

#[derive(Deserialize)]
struct RawPagination {
    current_page: usize,
    page_size: usize,
}

impl TryFrom<RawPagination> for Pagination {
    type Error = String;

    fn try_from(raw: RawPagination) -> Result<Self, Self::Error> {
        if raw.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        if raw.current_page == 0 {
            return Err("current_page starts at 1".to_string());
        }
        Ok(Self {
            current_page: raw.current_page,
            page_size: raw.page_size,
        })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Start at page 1 with the given page size (minimum 1)
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Current page, 1-based
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Pages needed for `len` rows
    #[must_use]
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    fn last_page(&self, len: usize) -> usize {
        self.total_pages(len).max(1)
    }

    /// Back to page 1
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Advance one page; no-op on the last page. Returns whether it moved.
    pub fn next(&mut self, len: usize) -> bool {
        if self.current_page < self.last_page(len) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; no-op on page 1. Returns whether it moved.
    pub fn prev(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, clamped to `[1, total_pages]`
    pub fn go_to(&mut self, page: usize, len: usize) {
        self.current_page = page.clamp(1, self.last_page(len));
    }

    /// Index range of the current page within a list of `len` rows
    #[must_use]
    pub fn page_range(&self, len: usize) -> Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    /// Rows on the current page
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.page_range(items.len())]
    }
}
