// components/job_poller/src/sink.rs
use download_protocol::{Job, JobId, JobProgress, JobStatus};

use crate::error::PollError;

/// Headline shown until the service reports a title
pub const PREPARING_HEADLINE: &str = "Preparing Download...";
pub const COMPLETE_HEADLINE: &str = "Download Complete!";

/// Observer of one poll run.
///
/// `completed` or `failed` is called at most once per job and nothing is
/// reported after it. A cancelled run reports neither.
pub trait ProgressSink {
    fn started(&self, job: &JobId);
    fn progress(&self, job: &JobId, view: &ProgressView);
    fn completed(&self, job: &Job);
    fn failed(&self, job: &JobId, error: &PollError);
}

/// What to display for a progress snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    /// Replaces the current headline when set
    pub headline: Option<String>,
    pub percent: u8,
    pub status_text: String,
}

impl ProgressView {
    pub fn from_snapshot(snapshot: &JobProgress) -> Self {
        let percent = snapshot.progress.min(100) as u8;
        let status_text = match snapshot.status {
            Some(JobStatus::Downloading) => format!("{percent}% - Downloading..."),
            Some(JobStatus::Preparing) => "Preparing download...".to_string(),
            _ => format!("{percent}%"),
        };

        Self {
            headline: snapshot
                .video_title
                .as_ref()
                .map(|title| format!("Downloading: {title}")),
            percent,
            status_text,
        }
    }
}
