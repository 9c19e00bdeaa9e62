use corpus_client::{
    ArticleRecord, ClientError, EngineCommand, EngineEvent, EngineHandle, JobStatusReport,
    OffsetPageBody, SearchRecord,
};
use corpus_core::{Article, Effect, JobStatus, Msg, OffsetPage, SearchHit};
use corpus_logging::{corpus_debug, corpus_warn};

/// Bridges core effects to the engine and engine events back to messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            corpus_debug!("effect {:?}", effect);
            self.engine.submit(to_command(effect));
        }
    }

    /// Drains every event the engine has ready.
    pub fn poll(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(to_msg(event));
        }
        inbox
    }
}

pub fn to_command(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchOffsetPage(request) => EngineCommand::FetchOffsetPage {
            seq: request.seq,
            start: request.start,
            count: request.count,
        },
        Effect::FetchCursorPage(request) => EngineCommand::FetchCursorPage {
            seq: request.seq,
            start_title: request.start_title,
            count: request.count,
            forward: request.forward,
        },
        Effect::Search { seq, query } => EngineCommand::Search { seq, query },
        Effect::StartJob => EngineCommand::StartJob,
        Effect::FetchJobStatus { seq } => EngineCommand::FetchJobStatus { seq },
        Effect::ScheduleTimer { timer, every } => EngineCommand::ScheduleTimer { timer, every },
        Effect::CancelTimer { timer } => EngineCommand::CancelTimer { timer },
        Effect::AddMember { index } => EngineCommand::AddMember { index },
        Effect::RemoveMember { title } => EngineCommand::RemoveMember { title },
    }
}

pub fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::OffsetPageLoaded { seq, result } => Msg::OffsetPageLoaded {
            seq,
            result: report(result).map(map_offset_page),
        },
        EngineEvent::CursorPageLoaded { seq, result } => Msg::CursorPageLoaded {
            seq,
            result: report(result).map(|records| records.into_iter().map(map_article).collect()),
        },
        EngineEvent::SearchCompleted { seq, result } => Msg::SearchLoaded {
            seq,
            result: report(result).map(|records| records.into_iter().map(map_hit).collect()),
        },
        EngineEvent::JobStarted { result } => Msg::JobStarted {
            result: report(result),
        },
        EngineEvent::JobStatusLoaded { seq, result } => Msg::JobStatusLoaded {
            seq,
            result: report(result).map(map_status),
        },
        EngineEvent::TimerFired { timer } => Msg::TimerFired { timer },
        EngineEvent::MembershipUpdated {
            title,
            removed,
            result,
        } => Msg::MembershipUpdated {
            title,
            removed,
            result: report(result),
        },
    }
}

fn report<T>(result: Result<T, ClientError>) -> Result<T, String> {
    result.map_err(|err| {
        corpus_warn!("request failed: {}", err);
        err.to_string()
    })
}

fn map_article(record: ArticleRecord) -> Article {
    Article {
        index: record.index,
        title: record.title,
        text: record.text,
        member: record.member,
    }
}

fn map_offset_page(body: OffsetPageBody) -> OffsetPage {
    OffsetPage {
        articles: body.articles.into_iter().map(map_article).collect(),
        total_count: body.total_count,
    }
}

fn map_hit(record: SearchRecord) -> SearchHit {
    SearchHit {
        title: record.title,
        text: record.text,
    }
}

fn map_status(report: JobStatusReport) -> JobStatus {
    JobStatus {
        running: report.running,
        results: report.results,
        partial: report.partial,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use corpus_client::{ArticleRecord, EngineCommand, EngineEvent, OffsetPageBody};
    use corpus_core::{Effect, Msg, PageRequest};

    use super::{to_command, to_msg};

    #[test]
    fn cursor_effect_keeps_lookahead_count() {
        let command = to_command(Effect::FetchCursorPage(PageRequest {
            seq: 9,
            start_title: Some("Rust".to_string()),
            count: 11,
            forward: false,
        }));
        assert_eq!(
            command,
            EngineCommand::FetchCursorPage {
                seq: 9,
                start_title: Some("Rust".to_string()),
                count: 11,
                forward: false,
            }
        );
    }

    #[test]
    fn timer_effects_map_one_to_one() {
        let every = Duration::from_millis(1500);
        assert_eq!(
            to_command(Effect::ScheduleTimer { timer: 2, every }),
            EngineCommand::ScheduleTimer { timer: 2, every }
        );
    }

    #[test]
    fn offset_event_becomes_core_page() {
        let msg = to_msg(EngineEvent::OffsetPageLoaded {
            seq: 3,
            result: Ok(OffsetPageBody {
                articles: vec![ArticleRecord {
                    index: Some(5),
                    title: "Rust".to_string(),
                    text: "lang".to_string(),
                    member: true,
                }],
                total_count: None,
            }),
        });
        let Msg::OffsetPageLoaded { seq, result } = msg else {
            panic!("unexpected message");
        };
        assert_eq!(seq, 3);
        let page = result.unwrap();
        assert_eq!(page.articles[0].index, Some(5));
        assert!(page.articles[0].member);
    }
}
