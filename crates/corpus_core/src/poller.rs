//! Single-flight tracking of the server-side job.
//!
//! The job has no push channel, so the poller asks for its status on a fixed
//! cadence while it runs. Whatever triggers a poll (the run button, the jobs
//! view coming to the front, a timer firing) at most one repeating timer is
//! ever live.

use std::time::Duration;

use corpus_logging::{corpus_debug, corpus_info, corpus_warn};

use crate::{Effect, JobStatus, RequestSeq};

pub type TimerId = u64;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed(String),
    CompletedPartial(Option<String>),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed(_) | JobState::CompletedPartial(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPoller {
    state: JobState,
    timer: Option<TimerId>,
    last_timer: TimerId,
    interval: Duration,
    last_seq: RequestSeq,
    last_error: Option<String>,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl JobPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: JobState::Idle,
            timer: None,
            last_timer: 0,
            interval,
            last_seq: 0,
            last_error: None,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of timers currently scheduled on behalf of this poller: 0 or 1.
    pub fn live_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    /// Asks the server to run the job. The request goes out even when a run
    /// is already in flight; polling resumes once the server acknowledges it.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.state == JobState::Running {
            corpus_debug!("job already running; re-sending run request");
        } else {
            corpus_info!("starting job");
            self.state = JobState::Running;
        }
        self.last_error = None;
        vec![Effect::StartJob]
    }

    /// Acknowledgement of the run request.
    pub fn job_started(&mut self, result: Result<(), String>) -> Vec<Effect> {
        if let Err(message) = result {
            corpus_warn!("run request failed: {}", message);
            self.last_error = Some(message);
        }
        self.tick()
    }

    /// The consumer became interested again; poll once right away.
    pub fn enter_foreground(&mut self) -> Vec<Effect> {
        self.tick()
    }

    pub fn timer_fired(&mut self, timer: TimerId) -> Vec<Effect> {
        if self.timer != Some(timer) {
            corpus_debug!("ignoring tick from retired timer {}", timer);
            return Vec::new();
        }
        self.tick()
    }

    pub fn apply_status(
        &mut self,
        seq: RequestSeq,
        result: Result<JobStatus, String>,
    ) -> Vec<Effect> {
        if seq != self.last_seq {
            corpus_debug!("dropping stale job status seq={} (latest {})", seq, self.last_seq);
            return Vec::new();
        }

        let status = match result {
            Ok(status) => status,
            Err(message) => {
                // Keep the state; a running job needs a timer for the retry.
                corpus_warn!("job status fetch failed: {}", message);
                self.last_error = Some(message);
                if self.state == JobState::Running {
                    return self.ensure_timer();
                }
                return Vec::new();
            }
        };
        self.last_error = None;

        if status.running {
            self.state = JobState::Running;
            return self.ensure_timer();
        }

        let effects = match self.timer.take() {
            Some(timer) => vec![Effect::CancelTimer { timer }],
            None => Vec::new(),
        };
        let was_running = self.state == JobState::Running;
        self.state = match (status.results, status.partial) {
            (Some(results), _) => JobState::Completed(results),
            (None, None) if !was_running && !self.state.is_terminal() => JobState::Idle,
            (None, partial) => JobState::CompletedPartial(partial),
        };
        if was_running {
            corpus_info!("job finished: {:?}", self.state);
        }
        effects
    }

    fn ensure_timer(&mut self) -> Vec<Effect> {
        if self.timer.is_some() {
            return Vec::new();
        }
        self.last_timer += 1;
        self.timer = Some(self.last_timer);
        vec![Effect::ScheduleTimer {
            timer: self.last_timer,
            every: self.interval,
        }]
    }

    fn tick(&mut self) -> Vec<Effect> {
        self.last_seq += 1;
        vec![Effect::FetchJobStatus { seq: self.last_seq }]
    }
}
