// components/job_poller/src/lib.rs
//! Tracks a server-side download job until it finishes.
//!
//! [`PollMachine`] decides what happens after every status response,
//! [`JobPoller`] drives it against a [`DownloadService`](download_client::DownloadService),
//! and [`DownloadController`] owns the single active poll.

mod config;
mod controller;
mod error;
mod machine;
mod poller;
mod scheduler;
mod sink;

#[cfg(test)]
mod stub;

pub use config::PollerConfig;
pub use controller::DownloadController;
pub use error::{ControllerError, PollError};
pub use machine::{PollMachine, PollOutcome, PollState, Step};
pub use poller::JobPoller;
pub use scheduler::{Scheduler, TokioScheduler};
pub use sink::{ProgressSink, ProgressView, COMPLETE_HEADLINE, PREPARING_HEADLINE};
