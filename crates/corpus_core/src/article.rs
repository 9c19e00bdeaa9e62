/// Tag attached to every outgoing request so that late replies can be told
/// apart from the one the state is waiting for.
pub type RequestSeq = u64;

/// Client-side projection of a corpus article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Server-assigned index. The cursor endpoint does not return it.
    pub index: Option<u64>,
    pub title: String,
    pub text: String,
    pub member: bool,
}

impl Article {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index: None,
            title: title.into(),
            text: text.into(),
            member: false,
        }
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }
}

/// Hit returned by the server-side search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub text: String,
}

/// One page returned by the offset endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetPage {
    pub articles: Vec<Article>,
    pub total_count: Option<u64>,
}

/// Raw job status as reported by the server, already rendered to text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobStatus {
    pub running: bool,
    pub results: Option<String>,
    pub partial: Option<String>,
}
