use std::time::Duration;

use corpus_logging::corpus_debug;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::types::{CursorPageBody, JobStatusBody, SearchBody};
use crate::{
    ArticleRecord, ClientError, FailureKind, JobStatusReport, OffsetPageBody, SearchRecord,
};

const OFFSET_PAGE_PATH: &str = "api/wikipedia-articles";
const CURSOR_PAGE_PATH: &str = "api/get_articles_page_from";
const RUN_JOB_PATH: &str = "api/run-tests";
const JOB_STATUS_PATH: &str = "api/test-results";
const SEARCH_PATH: &str = "api/search";
const MEMBER_PATH: &str = "api/alternator-wikipedia-article";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The REST operations the corpus core relies on.
#[async_trait::async_trait]
pub trait CorpusApi: Send + Sync {
    async fn fetch_page(&self, start: u64, count: usize) -> Result<OffsetPageBody, ClientError>;

    /// Reads `count` articles from `start_title`, ordered in the direction of
    /// travel. Forward reads include `start_title`; backward reads start just
    /// before it.
    async fn fetch_page_from(
        &self,
        start_title: Option<&str>,
        count: usize,
        forward: bool,
    ) -> Result<Vec<ArticleRecord>, ClientError>;

    async fn start_job(&self) -> Result<(), ClientError>;

    async fn job_status(&self) -> Result<JobStatusReport, ClientError>;

    async fn search(&self, query: &str) -> Result<Vec<SearchRecord>, ClientError>;

    async fn add_member(&self, index: u64) -> Result<(), ClientError>;

    async fn remove_member(&self, title: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCorpusClient {
    base: Url,
    http: reqwest::Client,
}

impl ReqwestCorpusClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let mut base_url = settings.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl CorpusApi for ReqwestCorpusClient {
    async fn fetch_page(&self, start: u64, count: usize) -> Result<OffsetPageBody, ClientError> {
        let mut url = self.endpoint(OFFSET_PAGE_PATH)?;
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("count", &count.to_string());
        corpus_debug!("GET {}", url);
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        decode_json(response).await
    }

    async fn fetch_page_from(
        &self,
        start_title: Option<&str>,
        count: usize,
        forward: bool,
    ) -> Result<Vec<ArticleRecord>, ClientError> {
        let mut url = self.endpoint(CURSOR_PAGE_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(title) = start_title.filter(|title| !title.is_empty()) {
                query.append_pair("start_title", title);
            }
            query
                .append_pair("count", &count.to_string())
                .append_pair("forward", if forward { "true" } else { "false" });
        }
        corpus_debug!("GET {}", url);
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        let body: CursorPageBody = decode_json(response).await?;
        Ok(body.articles)
    }

    async fn start_job(&self) -> Result<(), ClientError> {
        let url = self.endpoint(RUN_JOB_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&json!({}))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        expect_success(response)
    }

    async fn job_status(&self) -> Result<JobStatusReport, ClientError> {
        let url = self.endpoint(JOB_STATUS_PATH)?;
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        let body: JobStatusBody = decode_json(response).await?;
        Ok(body.into())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchRecord>, ClientError> {
        let mut url = self.endpoint(SEARCH_PATH)?;
        url.query_pairs_mut().append_pair("string_query", query);
        corpus_debug!("GET {}", url);
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        // Error bodies may arrive with any status code.
        match serde_json::from_str::<SearchBody>(&text) {
            Ok(SearchBody::Failed { error }) => Err(ClientError::new(FailureKind::Server, error)),
            Ok(SearchBody::Hits { articles }) if status.is_success() => Ok(articles),
            _ if !status.is_success() => Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            )),
            Ok(SearchBody::Hits { articles }) => Ok(articles),
            Err(err) => Err(ClientError::new(FailureKind::Decode, err.to_string())),
        }
    }

    async fn add_member(&self, index: u64) -> Result<(), ClientError> {
        let url = self.endpoint(MEMBER_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "index": index }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        expect_success(response)
    }

    async fn remove_member(&self, title: &str) -> Result<(), ClientError> {
        let url = self.endpoint(MEMBER_PATH)?;
        let response = self
            .http
            .delete(url)
            .json(&json!({ "title": title }))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        expect_success(response)
    }
}

fn expect_success(response: reqwest::Response) -> Result<(), ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
