// components/download_protocol/src/job.rs
use crate::protocol::JobProgress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the service hands out for a download job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Preparing,
    Downloading,
    Completed,
    Error,
    /// Any status this client does not know; treated as still running
    #[serde(other)]
    Unknown,
}

/// Client-side view of a server download job
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Percentage, always within 0..=100
    pub progress: u8,
    pub title: Option<String>,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Preparing,
            progress: 0,
            title: None,
        }
    }

    /// Fold a progress snapshot into the job.
    ///
    /// A missing status or title keeps the previous value.
    pub fn apply(&mut self, snapshot: &JobProgress) {
        if let Some(status) = snapshot.status {
            self.status = status;
        }
        self.progress = snapshot.progress.min(100) as u8;
        if let Some(title) = &snapshot.video_title {
            self.title = Some(title.clone());
        }
    }
}
