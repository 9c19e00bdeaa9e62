use crate::{JobState, Preview, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: ViewMode,
    pub browse: OffsetView,
    pub members: CursorView,
    pub search: SearchView,
    pub job: JobView,
    pub notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetView {
    pub page: u64,
    pub page_size: usize,
    pub max_page: Option<u64>,
    pub total_count: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<OffsetRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetRowView {
    pub index: Option<u64>,
    pub title: String,
    pub member: bool,
    pub expanded: bool,
    pub preview: Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorView {
    pub anchor: Option<String>,
    pub count: usize,
    pub has_next: bool,
    pub has_prev: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<CursorRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorRowView {
    pub title: String,
    pub expanded: bool,
    pub preview: Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchView {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub hits: Vec<SearchHitView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHitView {
    /// Escaped title with `<mark>` markup around the query.
    pub title: String,
    pub preview: Preview,
    /// Escaped preview text with `<mark>` markup around the query.
    pub highlighted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobView {
    pub state: JobState,
    pub live_timers: usize,
    pub error: Option<String>,
}
