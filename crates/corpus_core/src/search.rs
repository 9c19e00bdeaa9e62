use corpus_logging::{corpus_debug, corpus_warn};

use crate::{RequestSeq, SearchHit};

/// Latest search submitted by the user and what came back for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSession {
    query: String,
    hits: Vec<SearchHit>,
    error: Option<String>,
    last_seq: RequestSeq,
    pending: Option<RequestSeq>,
}

impl SearchSession {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a new query. Returns the sequence number to search under, or
    /// `None` for a blank query, which just clears the results.
    pub fn submit(&mut self, query: &str) -> Option<RequestSeq> {
        let query = query.trim();
        self.query = query.to_string();
        self.hits.clear();
        self.error = None;
        self.last_seq += 1;
        if query.is_empty() {
            self.pending = None;
            return None;
        }
        self.pending = Some(self.last_seq);
        Some(self.last_seq)
    }

    pub fn apply(&mut self, seq: RequestSeq, result: Result<Vec<SearchHit>, String>) -> bool {
        if self.pending != Some(seq) {
            corpus_debug!("dropping stale search reply seq={}", seq);
            return false;
        }
        self.pending = None;
        match result {
            Ok(hits) => {
                self.hits = hits;
                self.error = None;
            }
            Err(message) => {
                corpus_warn!("search for {:?} failed: {}", self.query, message);
                self.hits.clear();
                self.error = Some(message);
            }
        }
        true
    }
}
