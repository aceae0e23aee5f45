// components/job_poller/src/poller.rs
use download_client::DownloadService;
use download_protocol::JobId;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::PollerConfig;
use crate::error::PollError;
use crate::machine::{PollMachine, PollOutcome, Step};
use crate::scheduler::Scheduler;
use crate::sink::{ProgressSink, ProgressView};

/// Runs a [`PollMachine`] against the download service.
pub struct JobPoller {
    service: Arc<dyn DownloadService + Send + Sync>,
    scheduler: Arc<dyn Scheduler + Send + Sync>,
    sink: Arc<dyn ProgressSink + Send + Sync>,
    config: PollerConfig,
}

impl JobPoller {
    pub fn new(
        service: Arc<dyn DownloadService + Send + Sync>,
        scheduler: Arc<dyn Scheduler + Send + Sync>,
        sink: Arc<dyn ProgressSink + Send + Sync>,
        config: PollerConfig,
    ) -> Self {
        Self {
            service,
            scheduler,
            sink,
            config,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Poll `job_id` until it finishes, a limit is hit, or `cancel` fires.
    ///
    /// The first request goes out immediately. Cancellation drops both an
    /// in-flight request and a pending delay.
    pub async fn run(&self, job_id: JobId, cancel: CancellationToken) -> PollOutcome {
        let mut machine = PollMachine::new(job_id.clone(), self.config.clone());
        tracing::info!(job_id = %job_id, "Tracking download progress");
        self.sink.started(&job_id);

        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Self::cancelled(&job_id),
                response = self.service.job_progress(&job_id) => response,
            };

            let step = match response {
                Ok(snapshot) => {
                    let step = machine.on_snapshot(&snapshot);
                    if snapshot.reported_error().is_none() {
                        self.sink
                            .progress(&job_id, &ProgressView::from_snapshot(&snapshot));
                    }
                    step
                }
                Err(error) => machine.on_failure(&error),
            };

            match step {
                Step::Finished(outcome) => {
                    match &outcome {
                        Ok(job) => {
                            tracing::info!(job_id = %job_id, "Download completed");
                            self.sink.completed(job);
                        }
                        Err(error) => {
                            tracing::warn!(job_id = %job_id, error = %error, "Download failed");
                            self.sink.failed(&job_id, error);
                        }
                    }
                    return outcome;
                }
                Step::Continue(delay) => {
                    tracing::debug!(
                        job_id = %job_id,
                        delay_ms = delay.as_millis() as u64,
                        "Next progress check scheduled"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Self::cancelled(&job_id),
                        _ = self.scheduler.sleep(delay) => {}
                    }
                }
            }
        }
    }

    fn cancelled(job_id: &JobId) -> PollOutcome {
        tracing::info!(job_id = %job_id, "Progress tracking cancelled");
        Err(PollError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{
        downloading, network_error, GatedScheduler, RecordingScheduler, RecordingSink,
        ScriptedService, SinkEvent,
    };
    use assert_matches::assert_matches;
    use download_client::HttpDownloadService;
    use download_protocol::{JobProgress, JobStatus};
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn poller(
        service: Arc<ScriptedService>,
        scheduler: Arc<dyn Scheduler + Send + Sync>,
        sink: Arc<RecordingSink>,
    ) -> JobPoller {
        JobPoller::new(service, scheduler, sink, PollerConfig::default())
    }

    #[tokio::test]
    async fn test_completes_and_reports_once() {
        let service = Arc::new(ScriptedService::new(|_, call| match call {
            0 => Ok(JobProgress {
                status: Some(JobStatus::Preparing),
                ..Default::default()
            }),
            1 => Ok(downloading(55, Some("Song"))),
            _ => Ok(JobProgress {
                status: Some(JobStatus::Completed),
                progress: 100,
                ..Default::default()
            }),
        }));
        let scheduler = Arc::new(RecordingScheduler::default());
        let sink = Arc::new(RecordingSink::default());

        let job_id = JobId::new("dl_1");
        let outcome = poller(service.clone(), scheduler.clone(), sink.clone())
            .run(job_id.clone(), CancellationToken::new())
            .await;

        assert_matches!(outcome, Ok(job) => {
            assert_eq!(job.status, JobStatus::Completed);
            assert_eq!(job.title.as_deref(), Some("Song"));
        });
        assert_eq!(service.progress_calls(&job_id), 3);
        assert_eq!(scheduler.delays(), vec![Duration::from_millis(1000); 2]);

        let events = sink.events();
        assert_eq!(events.first(), Some(&SinkEvent::Started(job_id.clone())));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SinkEvent::Completed(_)))
                .count(),
            1
        );
        assert_matches!(events.last(), Some(SinkEvent::Completed(_)));
        assert!(events.contains(&SinkEvent::Progress(
            job_id,
            ProgressView {
                headline: Some("Downloading: Song".to_string()),
                percent: 55,
                status_text: "55% - Downloading...".to_string(),
            }
        )));
    }

    #[tokio::test]
    async fn test_error_payload_stops_without_progress_update() {
        let service = Arc::new(ScriptedService::new(|_, call| match call {
            0 => Ok(downloading(10, None)),
            _ => Ok(JobProgress {
                error: Some("x".to_string()),
                ..Default::default()
            }),
        }));
        let sink = Arc::new(RecordingSink::default());

        let job_id = JobId::new("dl_1");
        let outcome = poller(
            service.clone(),
            Arc::new(RecordingScheduler::default()),
            sink.clone(),
        )
        .run(job_id.clone(), CancellationToken::new())
        .await;

        assert_eq!(outcome, Err(PollError::Server("x".to_string())));
        assert_eq!(service.progress_calls(&job_id), 2);
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Started(job_id.clone()),
                SinkEvent::Progress(
                    job_id.clone(),
                    ProgressView::from_snapshot(&downloading(10, None))
                ),
                SinkEvent::Failed(job_id, PollError::Server("x".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_times_out_after_max_polls() {
        let service = Arc::new(ScriptedService::new(|_, _| Ok(downloading(3, None))));
        let scheduler = Arc::new(RecordingScheduler::default());
        let sink = Arc::new(RecordingSink::default());

        let job_id = JobId::new("dl_slow");
        let outcome = poller(service.clone(), scheduler.clone(), sink.clone())
            .run(job_id.clone(), CancellationToken::new())
            .await;

        assert_eq!(outcome, Err(PollError::Timeout { polls: 300 }));
        assert_eq!(service.progress_calls(&job_id), 300);
        assert_eq!(scheduler.delays().len(), 299);
        assert_matches!(
            sink.events().last(),
            Some(SinkEvent::Failed(_, PollError::Timeout { .. }))
        );
    }

    #[tokio::test]
    async fn test_network_failures_back_off_and_abort() {
        let service = Arc::new(ScriptedService::new(|_, _| Err(network_error())));
        let scheduler = Arc::new(RecordingScheduler::default());
        let sink = Arc::new(RecordingSink::default());

        let job_id = JobId::new("dl_1");
        let outcome = poller(service.clone(), scheduler.clone(), sink.clone())
            .run(job_id.clone(), CancellationToken::new())
            .await;

        assert_matches!(outcome, Err(PollError::Unreachable { attempts: 10, .. }));
        assert_eq!(service.progress_calls(&job_id), 10);
        assert_eq!(scheduler.delays(), vec![Duration::from_millis(2000); 9]);
        assert_eq!(
            sink.events()
                .iter()
                .filter(|e| matches!(e, SinkEvent::Progress(..)))
                .count(),
            0
        );
    }

    #[tokio::test]
    async fn test_intervening_success_resets_failures() {
        // 9 failures, one success, 9 failures, then completion
        let service = Arc::new(ScriptedService::new(|_, call| match call {
            9 => Ok(downloading(40, None)),
            19 => Ok(JobProgress {
                status: Some(JobStatus::Completed),
                progress: 100,
                ..Default::default()
            }),
            _ => Err(network_error()),
        }));
        let scheduler = Arc::new(RecordingScheduler::default());

        let outcome = poller(
            service.clone(),
            scheduler.clone(),
            Arc::new(RecordingSink::default()),
        )
        .run(JobId::new("dl_1"), CancellationToken::new())
        .await;

        assert_matches!(outcome, Ok(_));
        let delays = scheduler.delays();
        assert_eq!(delays.len(), 19);
        assert_eq!(delays[9], Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_delay() {
        let service = Arc::new(ScriptedService::new(|_, _| Ok(downloading(1, None))));
        let sink = Arc::new(RecordingSink::default());
        let poller = Arc::new(poller(
            service.clone(),
            Arc::new(GatedScheduler),
            sink.clone(),
        ));

        let job_id = JobId::new("dl_1");
        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let poller = poller.clone();
            let job_id = job_id.clone();
            let cancel = cancel.clone();
            async move { poller.run(job_id, cancel).await }
        });

        service.wait_for_calls(&job_id, 1).await;
        cancel.cancel();

        assert_eq!(task.await.unwrap(), Err(PollError::Cancelled));
        assert_eq!(service.progress_calls(&job_id), 1);
        assert!(!sink
            .events()
            .iter()
            .any(|e| matches!(e, SinkEvent::Completed(_) | SinkEvent::Failed(..))));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls() {
        let service = Arc::new(ScriptedService::new(|_, _| Ok(downloading(1, None))));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let job_id = JobId::new("dl_1");
        let outcome = poller(
            service.clone(),
            Arc::new(RecordingScheduler::default()),
            Arc::new(RecordingSink::default()),
        )
        .run(job_id.clone(), cancel)
        .await;

        assert_eq!(outcome, Err(PollError::Cancelled));
        assert_eq!(service.progress_calls(&job_id), 0);
    }

    #[tokio::test]
    async fn test_unknown_session_over_http_fails_with_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/progress/dl_1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "Download session not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = HttpDownloadService::new(Url::parse(&server.uri()).unwrap()).unwrap();
        let scheduler = Arc::new(RecordingScheduler::default());
        let sink = Arc::new(RecordingSink::default());
        let job_id = JobId::new("dl_1");

        let outcome = JobPoller::new(
            Arc::new(service),
            scheduler.clone(),
            sink.clone(),
            PollerConfig::default(),
        )
        .run(job_id.clone(), CancellationToken::new())
        .await;

        let expected = PollError::Server("Download session not found".to_string());
        assert_eq!(outcome, Err(expected.clone()));
        assert!(scheduler.delays().is_empty());
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Started(job_id.clone()), SinkEvent::Failed(job_id, expected)]
        );
    }
}
