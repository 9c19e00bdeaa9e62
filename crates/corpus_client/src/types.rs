use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Article as the server sends it. The cursor endpoint omits `index` and the
/// membership flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub index: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "alternator", default)]
    pub member: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffsetPageBody {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub(crate) struct CursorPageBody {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchBody {
    Failed {
        error: String,
    },
    Hits {
        #[serde(default)]
        articles: Vec<SearchRecord>,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub(crate) struct JobStatusBody {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub results: Option<serde_json::Value>,
    #[serde(default)]
    pub partial: Option<serde_json::Value>,
}

/// Job status with `results` and `partial` rendered to display text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobStatusReport {
    pub running: bool,
    pub results: Option<String>,
    pub partial: Option<String>,
}

impl From<JobStatusBody> for JobStatusReport {
    fn from(body: JobStatusBody) -> Self {
        Self {
            running: body.running,
            results: body.results.map(render_value),
            partial: body.partial.map(render_value),
        }
    }
}

fn render_value(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

pub type RequestSeq = u64;
pub type TimerId = u64;

/// Work the engine can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchOffsetPage {
        seq: RequestSeq,
        start: u64,
        count: usize,
    },
    FetchCursorPage {
        seq: RequestSeq,
        start_title: Option<String>,
        count: usize,
        forward: bool,
    },
    Search {
        seq: RequestSeq,
        query: String,
    },
    StartJob,
    FetchJobStatus {
        seq: RequestSeq,
    },
    ScheduleTimer {
        timer: TimerId,
        every: Duration,
    },
    CancelTimer {
        timer: TimerId,
    },
    AddMember {
        index: u64,
    },
    RemoveMember {
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    OffsetPageLoaded {
        seq: RequestSeq,
        result: Result<OffsetPageBody, ClientError>,
    },
    CursorPageLoaded {
        seq: RequestSeq,
        result: Result<Vec<ArticleRecord>, ClientError>,
    },
    SearchCompleted {
        seq: RequestSeq,
        result: Result<Vec<SearchRecord>, ClientError>,
    },
    JobStarted {
        result: Result<(), ClientError>,
    },
    JobStatusLoaded {
        seq: RequestSeq,
        result: Result<JobStatusReport, ClientError>,
    },
    TimerFired {
        timer: TimerId,
    },
    MembershipUpdated {
        title: Option<String>,
        removed: bool,
        result: Result<(), ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    /// The server answered with an `{ "error": ... }` body.
    Server,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Server => write!(f, "server error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArticleRecord, JobStatusBody, JobStatusReport, OffsetPageBody, SearchBody};

    #[test]
    fn missing_articles_decode_as_empty() {
        let body: OffsetPageBody = serde_json::from_str("{}").unwrap();
        assert!(body.articles.is_empty());
        assert_eq!(body.total_count, None);
    }

    #[test]
    fn cursor_article_without_index_decodes() {
        let record: ArticleRecord =
            serde_json::from_str(r#"{"title":"Rust","text":"a\nb"}"#).unwrap();
        assert_eq!(record.index, None);
        assert!(!record.member);
    }

    #[test]
    fn membership_flag_uses_wire_name() {
        let record: ArticleRecord =
            serde_json::from_str(r#"{"index":4,"title":"Rust","text":"","alternator":true}"#)
                .unwrap();
        assert!(record.member);
    }

    #[test]
    fn search_error_body_is_recognised() {
        let body: SearchBody = serde_json::from_str(r#"{"error":"bad query"}"#).unwrap();
        assert_eq!(
            body,
            SearchBody::Failed {
                error: "bad query".to_string()
            }
        );
    }

    #[test]
    fn job_results_render_strings_verbatim_and_objects_as_json() {
        let body: JobStatusBody =
            serde_json::from_str(r#"{"running":false,"results":{"passed":2},"partial":"log"}"#)
                .unwrap();
        let report = JobStatusReport::from(body);
        assert!(!report.running);
        assert_eq!(report.partial.as_deref(), Some("log"));
        assert!(report.results.unwrap().contains("\"passed\": 2"));
    }

    #[test]
    fn null_results_are_absent() {
        let body: JobStatusBody =
            serde_json::from_str(r#"{"running":true,"results":null,"partial":null}"#).unwrap();
        let report = JobStatusReport::from(body);
        assert_eq!(report, JobStatusReport {
            running: true,
            results: None,
            partial: None,
        });
    }
}
