use std::time::Duration;

use crate::{OffsetRequest, PageRequest, RequestSeq, TimerId};

/// I/O requested by `update`; executed by the driver, never by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchOffsetPage(OffsetRequest),
    FetchCursorPage(PageRequest),
    Search { seq: RequestSeq, query: String },
    StartJob,
    FetchJobStatus { seq: RequestSeq },
    /// Start a repeating timer that reports `Msg::TimerFired { timer }`.
    ScheduleTimer { timer: TimerId, every: Duration },
    CancelTimer { timer: TimerId },
    AddMember { index: u64 },
    RemoveMember { title: String },
}
