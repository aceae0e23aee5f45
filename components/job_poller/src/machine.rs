// components/job_poller/src/machine.rs
use download_client::ClientError;
use download_protocol::{Job, JobId, JobProgress, JobStatus};
use std::time::Duration;

use crate::config::PollerConfig;
use crate::error::PollError;

/// Message used when the service flags a job as failed without saying why
pub const DEFAULT_FAILURE: &str = "Download failed";

pub type PollOutcome = Result<Job, PollError>;

/// What the driver should do after feeding a response to the machine
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Poll again after the delay
    Continue(Duration),
    /// Stop polling; the job reached a terminal state or a limit was hit
    Finished(PollOutcome),
}

/// Counters of one poll run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollState {
    /// Successful responses that left the job running
    pub polls: u32,
    pub consecutive_failures: u32,
}

/// Decides, response by response, whether a job is still worth polling.
///
/// The machine does no I/O; see [`JobPoller`](crate::JobPoller) for the
/// loop that feeds it.
pub struct PollMachine {
    config: PollerConfig,
    state: PollState,
    job: Job,
}

impl PollMachine {
    pub fn new(job_id: JobId, config: PollerConfig) -> Self {
        Self {
            config,
            state: PollState::default(),
            job: Job::new(job_id),
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Feed a response that reached us and decoded
    pub fn on_snapshot(&mut self, snapshot: &JobProgress) -> Step {
        self.state.consecutive_failures = 0;
        self.job.apply(snapshot);

        if let Some(error) = snapshot.reported_error() {
            self.job.status = JobStatus::Error;
            return Step::Finished(Err(PollError::Server(error.to_string())));
        }

        match self.job.status {
            JobStatus::Completed => Step::Finished(Ok(self.job.clone())),
            JobStatus::Error => Step::Finished(Err(PollError::Server(DEFAULT_FAILURE.to_string()))),
            JobStatus::Preparing | JobStatus::Downloading | JobStatus::Unknown => {
                self.state.polls += 1;
                if self.state.polls >= self.config.max_polls {
                    tracing::warn!(
                        job_id = %self.job.id,
                        polls = self.state.polls,
                        "Giving up on job that never finished"
                    );
                    return Step::Finished(Err(PollError::Timeout {
                        polls: self.state.polls,
                    }));
                }
                Step::Continue(self.config.interval)
            }
        }
    }

    /// Feed a request that produced no usable answer
    pub fn on_failure(&mut self, error: &ClientError) -> Step {
        self.state.consecutive_failures += 1;
        tracing::warn!(
            job_id = %self.job.id,
            attempt = self.state.consecutive_failures,
            error = %error,
            "Progress check failed"
        );

        if self.state.consecutive_failures >= self.config.max_consecutive_failures {
            return Step::Finished(Err(PollError::Unreachable {
                attempts: self.state.consecutive_failures,
                last_error: error.to_string(),
            }));
        }
        Step::Continue(self.config.retry_interval)
    }
}
