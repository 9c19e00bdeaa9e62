//! Corpus core: pure navigation, polling and highlighting state machines.
mod article;
mod cursor;
mod effect;
mod highlight;
mod msg;
mod offset;
mod poller;
mod search;
mod state;
mod update;
mod view_model;

pub use article::{Article, JobStatus, OffsetPage, RequestSeq, SearchHit};
pub use cursor::{reduce_page, CursorPager, CursorState, Direction, PageRequest, Window};
pub use effect::Effect;
pub use highlight::{
    highlight, highlight_escaped, preview, Preview, DEFAULT_PREVIEW_LINES, TRUNCATED_BEFORE_MARKER,
};
pub use msg::Msg;
pub use offset::{OffsetPager, OffsetRequest};
pub use poller::{JobPoller, JobState, TimerId, DEFAULT_POLL_INTERVAL};
pub use search::SearchSession;
pub use state::{AppState, CoreSettings, ViewMode};
pub use update::{navigate_to, update};
pub use view_model::{
    AppViewModel, CursorRowView, CursorView, JobView, OffsetRowView, OffsetView, SearchHitView,
    SearchView,
};
