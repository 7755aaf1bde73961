//! Offset pagination over the post feed.

pub const PAGE_SIZE: u32 = 5;

/// A one-based page request with a fixed window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    page_size: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Pager {
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: PAGE_SIZE,
        }
    }

    /// Parse the `page` query parameter; absent, unparsable, and
    /// non-positive values all fall back to page 1.
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        Self::new(page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Zero-based inclusive window covered by this page.
    pub fn range(&self) -> (u64, u64) {
        let start = self.offset();
        (start, start + u64::from(self.page_size) - 1)
    }

    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(u64::from(self.page_size))
    }
}

/// One entry in the rendered pagination strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageItem {
    Number { page: u32, is_current: bool },
    Ellipsis,
}

/// The pagination strip for one feed page: numbered links for the first
/// page, the last page, and the current page's neighbors, with a single
/// ellipsis per gap.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u64,
    pub items: Vec<PageItem>,
}

impl PageWindow {
    pub fn build(pager: Pager, total_records: u64) -> Option<Self> {
        let total_pages = pager.total_pages(total_records);
        if total_pages <= 1 {
            return None;
        }

        let current = u64::from(pager.page()).min(total_pages);
        let mut items = Vec::new();
        for page in 1..=total_pages {
            let keep =
                page == 1 || page == total_pages || page.abs_diff(current) <= 1;
            if keep {
                items.push(PageItem::Number {
                    page: page as u32,
                    is_current: page == current,
                });
            } else if !matches!(items.last(), Some(PageItem::Ellipsis)) {
                items.push(PageItem::Ellipsis);
            }
        }

        Some(Self {
            current: current as u32,
            total_pages,
            items,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current) < self.total_pages
    }

    pub fn previous_page(&self) -> u32 {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        let next = u64::from(self.current) + 1;
        next.min(self.total_pages) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(window: &PageWindow) -> Vec<i64> {
        window
            .items
            .iter()
            .map(|item| match item {
                PageItem::Number { page, .. } => i64::from(*page),
                PageItem::Ellipsis => -1,
            })
            .collect()
    }

    #[test]
    fn total_pages_rounds_up() {
        let pager = Pager::new(1);
        assert_eq!(pager.total_pages(0), 0);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(5), 1);
        assert_eq!(pager.total_pages(6), 2);
        assert_eq!(pager.total_pages(11), 3);
    }

    #[test]
    fn page_range_is_zero_based_inclusive() {
        assert_eq!(Pager::new(1).range(), (0, 4));
        assert_eq!(Pager::new(2).range(), (5, 9));
        assert_eq!(Pager::new(3).range(), (10, 14));
    }

    #[test]
    fn query_parsing_defaults_to_page_one() {
        assert_eq!(Pager::from_query(None).page(), 1);
        assert_eq!(Pager::from_query(Some("")).page(), 1);
        assert_eq!(Pager::from_query(Some("abc")).page(), 1);
        assert_eq!(Pager::from_query(Some("0")).page(), 1);
        assert_eq!(Pager::from_query(Some("-3")).page(), 1);
        assert_eq!(Pager::from_query(Some("7")).page(), 7);
    }

    #[test]
    fn window_is_hidden_for_a_single_page() {
        assert!(PageWindow::build(Pager::new(1), 0).is_none());
        assert!(PageWindow::build(Pager::new(1), 5).is_none());
        assert!(PageWindow::build(Pager::new(1), 6).is_some());
    }

    #[test]
    fn window_keeps_edges_and_neighbors() {
        // 10 pages of 5, current page 5
        let window = PageWindow::build(Pager::new(5), 50).expect("window");
        assert_eq!(numbers(&window), vec![1, -1, 4, 5, 6, -1, 10]);
    }

    #[test]
    fn window_near_the_start_has_one_gap() {
        let window = PageWindow::build(Pager::new(2), 50).expect("window");
        assert_eq!(numbers(&window), vec![1, 2, 3, -1, 10]);
    }

    #[test]
    fn window_marks_the_current_page() {
        let window = PageWindow::build(Pager::new(2), 15).expect("window");
        let current: Vec<u32> = window
            .items
            .iter()
            .filter_map(|item| match item {
                PageItem::Number {
                    page,
                    is_current: true,
                } => Some(*page),
                _ => None,
            })
            .collect();
        assert_eq!(current, vec![2]);
    }

    #[test]
    fn window_clamps_out_of_range_pages() {
        // Page 9 requested but only 3 pages exist.
        let window = PageWindow::build(Pager::new(9), 15).expect("window");
        assert_eq!(window.current, 3);
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[test]
    fn navigation_is_disabled_at_the_bounds() {
        let first = PageWindow::build(Pager::new(1), 50).expect("window");
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.next_page(), 2);

        let last = PageWindow::build(Pager::new(10), 50).expect("window");
        assert!(last.has_previous());
        assert!(!last.has_next());
        assert_eq!(last.previous_page(), 9);
    }
}
