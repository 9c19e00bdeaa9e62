//! Corpus client: REST access to the article corpus and effect execution.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, CorpusApi, ReqwestCorpusClient};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    ArticleRecord, ClientError, EngineCommand, EngineEvent, FailureKind, JobStatusReport,
    OffsetPageBody, RequestSeq, SearchRecord, TimerId,
};
