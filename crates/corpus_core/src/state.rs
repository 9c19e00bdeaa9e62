use std::time::Duration;

use crate::view_model::{
    AppViewModel, CursorRowView, CursorView, JobView, OffsetRowView, OffsetView, SearchHitView,
    SearchView,
};
use crate::{
    highlight_escaped, preview, CursorPager, JobPoller, OffsetPager, SearchSession,
    DEFAULT_POLL_INTERVAL, DEFAULT_PREVIEW_LINES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Browse,
    Members,
    Jobs,
}

/// Start-up knobs for the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub page_size: usize,
    pub cursor_count: usize,
    pub poll_interval: Duration,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            cursor_count: 10,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    mode: ViewMode,
    offset: OffsetPager,
    cursor: CursorPager,
    poller: JobPoller,
    search: SearchSession,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &CoreSettings) -> Self {
        Self {
            offset: OffsetPager::new(settings.page_size),
            cursor: CursorPager::new(settings.cursor_count),
            poller: JobPoller::new(settings.poll_interval),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn cursor(&self) -> &CursorPager {
        &self.cursor
    }

    pub fn offset(&self) -> &OffsetPager {
        &self.offset
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn view(&self) -> AppViewModel {
        let query = self.search.query();
        AppViewModel {
            mode: self.mode,
            browse: OffsetView {
                page: self.offset.page(),
                page_size: self.offset.page_size(),
                max_page: self.offset.max_page(),
                total_count: self.offset.total_count(),
                loading: self.offset.is_loading(),
                error: self.offset.error().map(ToOwned::to_owned),
                rows: self
                    .offset
                    .articles()
                    .iter()
                    .map(|article| OffsetRowView {
                        index: article.index,
                        title: article.title.clone(),
                        member: article.member,
                        expanded: article
                            .index
                            .is_some_and(|index| self.offset.is_expanded(index)),
                        preview: preview(&article.text, "", DEFAULT_PREVIEW_LINES),
                    })
                    .collect(),
            },
            members: CursorView {
                anchor: self.cursor.cursor().anchor_key.clone(),
                count: self.cursor.count(),
                has_next: self.cursor.can_advance(),
                has_prev: self.cursor.can_retreat(),
                loading: self.cursor.is_loading(),
                error: self.cursor.error().map(ToOwned::to_owned),
                rows: self
                    .cursor
                    .window()
                    .items
                    .iter()
                    .map(|article| CursorRowView {
                        title: article.title.clone(),
                        expanded: self.cursor.is_expanded(&article.title),
                        preview: preview(&article.text, "", DEFAULT_PREVIEW_LINES),
                    })
                    .collect(),
            },
            search: SearchView {
                query: query.to_string(),
                loading: self.search.is_loading(),
                error: self.search.error().map(ToOwned::to_owned),
                hits: self
                    .search
                    .hits()
                    .iter()
                    .map(|hit| {
                        let preview = preview(&hit.text, query, DEFAULT_PREVIEW_LINES);
                        SearchHitView {
                            title: highlight_escaped(&hit.title, query),
                            highlighted: highlight_escaped(&preview.text, query),
                            preview,
                        }
                    })
                    .collect(),
            },
            job: JobView {
                state: self.poller.state().clone(),
                live_timers: self.poller.live_timers(),
                error: self.poller.last_error().map(ToOwned::to_owned),
            },
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub(crate) fn offset_mut(&mut self) -> &mut OffsetPager {
        &mut self.offset
    }

    pub(crate) fn cursor_mut(&mut self) -> &mut CursorPager {
        &mut self.cursor
    }

    pub(crate) fn poller_mut(&mut self) -> &mut JobPoller {
        &mut self.poller
    }

    pub(crate) fn search_mut(&mut self) -> &mut SearchSession {
        &mut self.search
    }

    /// Flips the local membership flag on every displayed copy of an article.
    /// The change is optimistic and never rolled back.
    pub(crate) fn mark_member(&mut self, index: Option<u64>, title: Option<&str>, member: bool) {
        let matches = |article: &crate::Article| {
            index.is_some_and(|index| article.index == Some(index))
                || title.is_some_and(|title| article.title == title)
        };
        for article in self.offset.articles_mut().filter(|a| matches(&**a)) {
            article.member = member;
        }
        for article in self.cursor.articles_mut().filter(|a| matches(&**a)) {
            article.member = member;
        }
    }
}
