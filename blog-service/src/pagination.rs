//! Fixed-size page arithmetic for feed listings
//!
//! Pages are 1-based. A request past the last page is a valid, empty page;
//! it never errors and never clamps back to the last page.

/// Posts per feed page
pub const PAGE_SIZE: u64 = 10;

/// Page arithmetic over a known total row count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_count: u64,
    page_size: u64,
}

impl Paginator {
    pub fn new(total_count: u64) -> Self {
        Self::with_page_size(total_count, PAGE_SIZE)
    }

    pub fn with_page_size(total_count: u64, page_size: u64) -> Self {
        debug_assert!(page_size > 0);
        Self {
            total_count,
            page_size: page_size.max(1),
        }
    }

    /// Missing or zero page numbers mean page 1
    pub fn normalize(page: Option<u64>) -> u64 {
        page.filter(|&p| p >= 1).unwrap_or(1)
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// ⌈total/size⌉, with an empty listing still owning one (empty) page
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.page_size).max(1)
    }

    /// Row offset of a 1-based page, clamped to the total row count: any
    /// offset at or past the end selects an empty page, so arbitrarily large
    /// page numbers stay cheap and cannot overflow.
    pub fn offset(&self, page: u64) -> u64 {
        (page.max(1) - 1)
            .saturating_mul(self.page_size)
            .min(self.total_count)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Number of rows page `page` holds
    pub fn len_of(&self, page: u64) -> u64 {
        let offset = self.offset(page);
        self.total_count.saturating_sub(offset).min(self.page_size)
    }

    pub fn has_next(&self, page: u64) -> bool {
        page.max(1) < self.total_pages()
    }

    pub fn has_previous(&self, page: u64) -> bool {
        page.max(1) > 1 && self.total_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_to_first_page() {
        assert_eq!(Paginator::normalize(None), 1);
        assert_eq!(Paginator::normalize(Some(0)), 1);
        assert_eq!(Paginator::normalize(Some(3)), 3);
    }

    #[test]
    fn fifteen_posts_split_ten_five() {
        let p = Paginator::new(15);
        assert_eq!(p.total_pages(), 2);
        assert_eq!(p.len_of(1), 10);
        assert_eq!(p.len_of(2), 5);
        assert_eq!(p.len_of(3), 0);
        assert!(p.has_next(1));
        assert!(!p.has_next(2));
        assert!(!p.has_previous(1));
        assert!(p.has_previous(2));
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let p = Paginator::new(0);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.len_of(1), 0);
        assert!(!p.has_next(1));
        assert!(!p.has_previous(1));
        assert!(!p.has_previous(2));
    }

    #[test]
    fn page_beyond_range_is_empty_not_clamped() {
        let p = Paginator::new(12);
        assert_eq!(p.len_of(99), 0);
        assert_eq!(p.offset(99), 12);
        assert!(!p.has_next(99));
    }

    #[test]
    fn absurd_page_numbers_never_panic_and_stay_empty() {
        let p = Paginator::new(15);
        assert_eq!(p.offset(u64::MAX), 15);
        assert_eq!(p.len_of(u64::MAX), 0);
        assert!(!p.has_next(u64::MAX));
        assert_eq!(Paginator::new(0).offset(u64::MAX), 0);
    }

    #[test]
    fn pages_partition_every_total() {
        // Concatenated pages must cover every row exactly once, each page at
        // most PAGE_SIZE long, over a spread of totals.
        for total in 0..=53 {
            let p = Paginator::new(total);
            assert_eq!(p.total_pages(), (total.div_ceil(PAGE_SIZE)).max(1));

            let mut covered = 0;
            for page in 1..=p.total_pages() {
                let len = p.len_of(page);
                assert!(len <= PAGE_SIZE);
                assert_eq!(p.offset(page), covered);
                covered += len;
            }
            assert_eq!(covered, total, "pages must partition {total} rows");
            assert_eq!(p.len_of(p.total_pages() + 1), 0);
        }
    }

    #[test]
    fn only_last_page_may_be_short() {
        for total in 1..=41 {
            let p = Paginator::new(total);
            for page in 1..p.total_pages() {
                assert_eq!(p.len_of(page), PAGE_SIZE);
            }
            assert!(p.len_of(p.total_pages()) >= 1);
        }
    }
}
