// components/job_poller/src/controller.rs
use download_client::{save_file, DownloadService};
use download_protocol::{validate_url, DownloadRequest, Format, Job, JobId, Quality, VideoInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PollerConfig;
use crate::error::{ControllerError, PollError};
use crate::machine::PollOutcome;
use crate::poller::JobPoller;
use crate::scheduler::Scheduler;
use crate::sink::ProgressSink;

struct ActivePoll {
    job_id: JobId,
    cancel: CancellationToken,
    handle: JoinHandle<PollOutcome>,
}

/// Front end to the download service that tracks at most one job at a time.
pub struct DownloadController {
    service: Arc<dyn DownloadService + Send + Sync>,
    poller: Arc<JobPoller>,
    active: Option<ActivePoll>,
}

impl DownloadController {
    pub fn new(
        service: Arc<dyn DownloadService + Send + Sync>,
        scheduler: Arc<dyn Scheduler + Send + Sync>,
        sink: Arc<dyn ProgressSink + Send + Sync>,
        config: PollerConfig,
    ) -> Self {
        let poller = JobPoller::new(service.clone(), scheduler, sink, config);
        Self {
            service,
            poller: Arc::new(poller),
            active: None,
        }
    }

    /// Ping the service for updates in the background, ignoring the result
    pub fn check_for_update(&self) -> JoinHandle<()> {
        let service = self.service.clone();
        tokio::spawn(async move {
            match service.check_for_update().await {
                Ok(()) => tracing::debug!("Silent update check completed"),
                Err(e) => tracing::debug!(error = %e, "Silent update check failed"),
            }
        })
    }

    /// Validate `url` and look up its metadata
    pub async fn video_info(&self, url: &str) -> Result<VideoInfo, ControllerError> {
        let url = validate_url(url)?;
        self.service.video_info(url).await.map_err(|e| {
            ControllerError::from_client("Could not fetch video information", e)
        })
    }

    /// Validate `url`, start a download job and begin tracking it
    pub async fn submit(
        &mut self,
        url: &str,
        format: Format,
        quality: Quality,
    ) -> Result<JobId, ControllerError> {
        let request = DownloadRequest {
            url: validate_url(url)?.to_string(),
            format,
            quality,
        };

        let job_id = self
            .service
            .start_download(&request)
            .await
            .map_err(|e| ControllerError::from_client("Could not start download", e))?;

        self.start_polling(job_id.clone()).await;
        Ok(job_id)
    }

    /// Track `job_id`, cancelling whatever job was tracked before
    pub async fn start_polling(&mut self, job_id: JobId) {
        self.stop_polling().await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let poller = self.poller.clone();
            let job_id = job_id.clone();
            let cancel = cancel.clone();
            async move { poller.run(job_id, cancel).await }
        });

        self.active = Some(ActivePoll {
            job_id,
            cancel,
            handle,
        });
    }

    /// Cancel the tracked job, if any, and wait for its task to wind down
    pub async fn stop_polling(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        active.cancel.cancel();
        match active.handle.await {
            Ok(Err(PollError::Cancelled)) => {
                tracing::debug!(job_id = %active.job_id, "Stopped tracking job")
            }
            Ok(_) => tracing::debug!(job_id = %active.job_id, "Job had already finished"),
            Err(e) => tracing::warn!(job_id = %active.job_id, error = %e, "Progress task failed"),
        }
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.active.as_ref().map(|active| &active.job_id)
    }

    /// Wait for the tracked job to finish.
    ///
    /// The job stays tracked until its outcome is in, so dropping this future
    /// early leaves it to `stop_polling` or `Drop`.
    pub async fn wait(&mut self) -> Result<Job, ControllerError> {
        let active = self.active.as_mut().ok_or(ControllerError::Idle)?;
        let outcome = (&mut active.handle).await;
        self.active = None;
        Ok(outcome??)
    }

    /// Save the artifact of a completed job into `dir`
    pub async fn fetch_artifact(&self, job: &JobId, dir: &Path) -> Result<PathBuf, ControllerError> {
        save_file(self.service.as_ref(), job, dir)
            .await
            .map_err(|e| ControllerError::from_client("Could not download file", e))
    }

    pub fn poller_config(&self) -> &PollerConfig {
        self.poller.config()
    }
}

impl Drop for DownloadController {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.cancel.cancel();
        }
    }
}
