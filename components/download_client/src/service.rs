// components/download_client/src/service.rs
use async_trait::async_trait;
use bytes::Bytes;
use download_protocol::{DownloadRequest, JobId, JobProgress, VideoInfo};

use crate::error::ClientError;

/// Artifact returned by `GET /download_file/{id}`
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Name suggested by the service, if any
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait DownloadService {
    /// Fetch metadata about a video without starting a download
    async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError>;

    /// Ask the service to start a download job
    async fn start_download(&self, request: &DownloadRequest) -> Result<JobId, ClientError>;

    /// Fetch the current progress snapshot of a job.
    ///
    /// Error payloads from the service are returned inside the snapshot, not
    /// as `Err`; `Err` always means no usable answer arrived.
    async fn job_progress(&self, job: &JobId) -> Result<JobProgress, ClientError>;

    /// Fetch the finished artifact of a completed job
    async fn fetch_file(&self, job: &JobId) -> Result<DownloadedFile, ClientError>;

    /// Best-effort update ping
    async fn check_for_update(&self) -> Result<(), ClientError>;
}
