//! Client-side windowing over the full order list.

use shared::protocol::OrderSummary;

pub const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

/// Page strip for `current` of `total` pages, e.g. `[1, …, 4, 5, 6, …, 12]`.
/// Runs that fit in five entries are returned in full.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageToken> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageToken::Page).collect();
    }

    let mut pages = vec![PageToken::Page(1)];
    if current > 3 {
        pages.push(PageToken::Ellipsis);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    pages.extend((start..=end).map(PageToken::Page));

    if current + 2 < total {
        pages.push(PageToken::Ellipsis);
    }
    pages.push(PageToken::Page(total));
    pages
}

#[derive(Debug, Clone)]
pub struct OrderList {
    orders: Vec<OrderSummary>,
    page_size: usize,
    current_page: usize,
}

impl Default for OrderList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl OrderList {
    pub fn new(page_size: usize) -> Self {
        Self {
            orders: Vec::new(),
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    /// Swaps in a freshly fetched list. The page resets to 1 when the list
    /// shrank past the current page.
    pub fn replace(&mut self, orders: Vec<OrderSummary>) {
        self.orders = orders;
        let last_page = self.total_pages();
        if self.current_page > last_page && last_page > 0 {
            self.current_page = 1;
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.orders.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Moves to `page`, clamped to the pages that exist.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages().max(1));
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1))
    }

    /// Orders on the current page.
    pub fn visible(&self) -> &[OrderSummary] {
        let start = ((self.current_page - 1) * self.page_size).min(self.orders.len());
        let end = (start + self.page_size).min(self.orders.len());
        &self.orders[start..end]
    }

    pub fn page_numbers(&self) -> Vec<PageToken> {
        page_numbers(self.current_page, self.total_pages())
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
