use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use corpus_logging::{corpus_debug, corpus_info};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, CorpusApi, ReqwestCorpusClient};
use crate::{ClientError, EngineCommand, EngineEvent, TimerId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Runs requests and timers on a background tokio runtime.
///
/// Replies come back through [`EngineHandle::try_recv`] in completion order,
/// which need not match submission order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestCorpusClient::new(settings)?;
        Self::with_api(Arc::new(client))
    }

    pub fn with_api(api: Arc<dyn CorpusApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || run_engine(runtime, api, cmd_rx, event_tx));

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn run_engine(
    runtime: Runtime,
    api: Arc<dyn CorpusApi>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut timers: HashMap<TimerId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::ScheduleTimer { timer, every } => {
                let token = CancellationToken::new();
                if let Some(previous) = timers.insert(timer, token.clone()) {
                    previous.cancel();
                }
                corpus_debug!("timer {} scheduled every {:?}", timer, every);
                runtime.spawn(run_timer(timer, every, token, event_tx.clone()));
            }
            EngineCommand::CancelTimer { timer } => {
                if let Some(token) = timers.remove(&timer) {
                    corpus_debug!("timer {} cancelled", timer);
                    token.cancel();
                }
            }
            command => {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(event) = handle_request(api.as_ref(), command).await {
                        let _ = event_tx.send(event);
                    }
                });
            }
        }
    }

    corpus_info!("engine command channel closed; stopping {} timer(s)", timers.len());
    for token in timers.into_values() {
        token.cancel();
    }
}

async fn run_timer(
    timer: TimerId,
    every: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if event_tx.send(EngineEvent::TimerFired { timer }).is_err() {
                    break;
                }
            }
        }
    }
}

/// Performs one request command. Timer commands never reach this point.
async fn handle_request(api: &dyn CorpusApi, command: EngineCommand) -> Option<EngineEvent> {
    let event = match command {
        EngineCommand::FetchOffsetPage { seq, start, count } => EngineEvent::OffsetPageLoaded {
            seq,
            result: api.fetch_page(start, count).await,
        },
        EngineCommand::FetchCursorPage {
            seq,
            start_title,
            count,
            forward,
        } => EngineEvent::CursorPageLoaded {
            seq,
            result: api
                .fetch_page_from(start_title.as_deref(), count, forward)
                .await,
        },
        EngineCommand::Search { seq, query } => EngineEvent::SearchCompleted {
            seq,
            result: api.search(&query).await,
        },
        EngineCommand::StartJob => EngineEvent::JobStarted {
            result: api.start_job().await,
        },
        EngineCommand::FetchJobStatus { seq } => EngineEvent::JobStatusLoaded {
            seq,
            result: api.job_status().await,
        },
        EngineCommand::AddMember { index } => EngineEvent::MembershipUpdated {
            title: None,
            removed: false,
            result: api.add_member(index).await,
        },
        EngineCommand::RemoveMember { title } => {
            let result = api.remove_member(&title).await;
            EngineEvent::MembershipUpdated {
                title: Some(title),
                removed: true,
                result,
            }
        }
        EngineCommand::ScheduleTimer { .. } | EngineCommand::CancelTimer { .. } => return None,
    };
    Some(event)
}
