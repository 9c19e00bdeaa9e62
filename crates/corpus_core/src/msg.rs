use crate::{Article, JobStatus, OffsetPage, RequestSeq, SearchHit, TimerId, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// First message after start-up.
    Init,
    /// User switched the active view.
    NavigateTo(ViewMode),
    /// Offset view: next page.
    OffsetNextPage,
    /// Offset view: previous page.
    OffsetPrevPage,
    /// Offset view: page size edited.
    OffsetPageSizeChanged(usize),
    /// Offset view: page number typed in.
    OffsetPageChanged(u64),
    /// Engine reply for an offset page.
    OffsetPageLoaded {
        seq: RequestSeq,
        result: Result<OffsetPage, String>,
    },
    /// Cursor view: starting title edited.
    CursorAnchorChanged(String),
    /// Cursor view: window length edited.
    CursorCountChanged(usize),
    CursorNext,
    CursorPrev,
    /// Engine reply for a cursor page, in traversal order.
    CursorPageLoaded {
        seq: RequestSeq,
        result: Result<Vec<Article>, String>,
    },
    /// Toggle the detail row of a cursor-view article.
    CursorRowToggled { title: String },
    /// Toggle the detail row of an offset-view article.
    OffsetRowToggled { index: u64 },
    AddMemberClicked { index: u64 },
    RemoveMemberClicked { title: String },
    /// Engine acknowledgement of a membership change.
    MembershipUpdated {
        title: Option<String>,
        removed: bool,
        result: Result<(), String>,
    },
    SearchSubmitted(String),
    SearchLoaded {
        seq: RequestSeq,
        result: Result<Vec<SearchHit>, String>,
    },
    RunJobClicked,
    /// Engine acknowledgement of the run request.
    JobStarted { result: Result<(), String> },
    JobStatusLoaded {
        seq: RequestSeq,
        result: Result<JobStatus, String>,
    },
    TimerFired { timer: TimerId },
    /// UI/render tick to coalesce rendering.
    Tick,
}
