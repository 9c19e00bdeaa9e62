use std::collections::BTreeSet;

use corpus_logging::{corpus_debug, corpus_warn};

use crate::{Article, OffsetPage, RequestSeq};

/// Request for the offset endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetRequest {
    pub seq: RequestSeq,
    pub start: u64,
    pub count: usize,
}

/// Plain page-number navigation over the offset endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPager {
    page: u64,
    page_size: usize,
    total_count: Option<u64>,
    articles: Vec<Article>,
    expanded: BTreeSet<u64>,
    last_seq: RequestSeq,
    pending: Option<RequestSeq>,
    error: Option<String>,
}

impl Default for OffsetPager {
    fn default() -> Self {
        Self::new(10)
    }
}

impl OffsetPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_count: None,
            articles: Vec::new(),
            expanded: BTreeSet::new(),
            last_seq: 0,
            pending: None,
            error: None,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last page number, known only once the server reported a total.
    pub fn max_page(&self) -> Option<u64> {
        self.total_count
            .map(|total| total.div_ceil(self.page_size as u64).max(1))
    }

    pub fn load(&mut self) -> OffsetRequest {
        self.last_seq += 1;
        self.pending = Some(self.last_seq);
        OffsetRequest {
            seq: self.last_seq,
            start: (self.page - 1).saturating_mul(self.page_size as u64),
            count: self.page_size,
        }
    }

    pub fn next_page(&mut self) -> OffsetRequest {
        self.page = self.page.saturating_add(1);
        self.load()
    }

    pub fn prev_page(&mut self) -> Option<OffsetRequest> {
        if self.page <= 1 {
            return None;
        }
        self.page -= 1;
        Some(self.load())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> OffsetRequest {
        self.page_size = page_size.max(1);
        self.page = 1;
        self.load()
    }

    pub fn set_page(&mut self, page: u64) -> OffsetRequest {
        let mut page = page.max(1);
        if let Some(max_page) = self.max_page() {
            if self.total_count != Some(0) {
                page = page.min(max_page);
            }
        }
        self.page = page;
        self.load()
    }

    /// Applies a reply; stale replies are ignored and reported as `false`.
    pub fn apply(&mut self, seq: RequestSeq, result: Result<OffsetPage, String>) -> bool {
        if self.pending != Some(seq) {
            corpus_debug!("dropping stale offset reply seq={} (latest {})", seq, self.last_seq);
            return false;
        }
        self.pending = None;
        self.expanded.clear();
        match result {
            Ok(page) => {
                self.articles = page.articles;
                self.total_count = page.total_count;
                self.error = None;
            }
            Err(message) => {
                corpus_warn!("offset page fetch failed: {}", message);
                self.articles.clear();
                self.error = Some(message);
            }
        }
        true
    }

    pub fn toggle_expanded(&mut self, index: u64) {
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    pub fn is_expanded(&self, index: u64) -> bool {
        self.expanded.contains(&index)
    }

    pub(crate) fn articles_mut(&mut self) -> impl Iterator<Item = &mut Article> {
        self.articles.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::OffsetPager;
    use crate::OffsetPage;

    #[test]
    fn start_follows_page_and_size() {
        let mut pager = OffsetPager::new(25);
        assert_eq!(pager.load().start, 0);
        assert_eq!(pager.next_page().start, 25);
        assert_eq!(pager.next_page().start, 50);
        let request = pager.set_page_size(10);
        assert_eq!((request.start, request.count), (0, 10));
    }

    #[test]
    fn prev_page_stops_at_first_page() {
        let mut pager = OffsetPager::new(10);
        assert!(pager.prev_page().is_none());
        pager.next_page();
        assert_eq!(pager.prev_page().map(|r| r.start), Some(0));
    }

    #[test]
    fn manual_page_is_clamped_once_total_is_known() {
        let mut pager = OffsetPager::new(10);
        let request = pager.load();
        pager.apply(
            request.seq,
            Ok(OffsetPage {
                articles: Vec::new(),
                total_count: Some(41),
            }),
        );
        assert_eq!(pager.max_page(), Some(5));
        pager.set_page(9);
        assert_eq!(pager.page(), 5);
        pager.set_page(0);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn unknown_total_leaves_page_unclamped() {
        let mut pager = OffsetPager::new(10);
        pager.set_page(12);
        assert_eq!(pager.page(), 12);
        assert_eq!(pager.max_page(), None);
    }

    #[test]
    fn huge_page_numbers_saturate_the_start_offset() {
        let mut pager = OffsetPager::new(10);
        assert_eq!(pager.set_page(u64::MAX).start, u64::MAX);
        assert_eq!(pager.next_page().start, u64::MAX);
        assert_eq!(pager.page(), u64::MAX);

        let mut pager = OffsetPager::new(usize::MAX);
        assert_eq!(pager.next_page().start, usize::MAX as u64);
    }
}
