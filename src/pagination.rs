//! Page window over the visible rows of a [`crate::table_model::TableModel`].

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const PAGE_SIZES: [usize; 5] = [50, 100, 500, 1000, 5000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Visible-row indices on the current page.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }

    /// 1-based index of the first row on the page, 0 when empty.
    pub fn showing_from(&self, total: usize) -> usize {
        if total == 0 {
            0
        } else {
            self.range(total).start + 1
        }
    }

    pub fn showing_to(&self, total: usize) -> usize {
        self.range(total).end
    }

    pub fn summary(&self, total: usize) -> String {
        if total == 0 {
            return String::new();
        }
        format!(
            "Showing {} to {} of {} entries",
            self.showing_from(total),
            self.showing_to(total),
            total
        )
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn go_to_page(&mut self, page: usize, total: usize) {
        let last = self.page_count(total).saturating_sub(1);
        self.page = page.min(last);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}
