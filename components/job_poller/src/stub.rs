// components/job_poller/src/stub.rs
//! Test doubles for the service, scheduler and sink seams.

use async_trait::async_trait;
use bytes::Bytes;
use download_client::{ClientError, DownloadService, DownloadedFile};
use download_protocol::{DownloadRequest, Job, JobId, JobProgress, JobStatus, VideoInfo};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Notify;

use crate::error::PollError;
use crate::scheduler::Scheduler;
use crate::sink::{ProgressSink, ProgressView};

type ProgressScript = Box<dyn Fn(&JobId, usize) -> Result<JobProgress, ClientError> + Send + Sync>;

pub fn downloading(progress: u32, title: Option<&str>) -> JobProgress {
    JobProgress {
        status: Some(JobStatus::Downloading),
        progress,
        video_title: title.map(str::to_string),
        ..Default::default()
    }
}

pub fn network_error() -> ClientError {
    ClientError::Protocol("connection refused".to_string())
}

/// Service answering progress checks from a script keyed by call index
pub struct ScriptedService {
    progress: ProgressScript,
    progress_calls: Mutex<HashMap<JobId, usize>>,
    called: Notify,
    info: Mutex<VecDeque<Result<VideoInfo, ClientError>>>,
    started: Mutex<VecDeque<Result<JobId, ClientError>>>,
    requests: Mutex<Vec<String>>,
    update_reachable: bool,
}

impl ScriptedService {
    pub fn new(
        progress: impl Fn(&JobId, usize) -> Result<JobProgress, ClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            progress: Box::new(progress),
            progress_calls: Mutex::new(HashMap::new()),
            called: Notify::new(),
            info: Mutex::new(VecDeque::new()),
            started: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            update_reachable: true,
        }
    }

    pub fn with_info(self, info: Result<VideoInfo, ClientError>) -> Self {
        self.info.lock().push_back(info);
        self
    }

    pub fn with_started(self, job: Result<JobId, ClientError>) -> Self {
        self.started.lock().push_back(job);
        self
    }

    pub fn with_unreachable_updates(mut self) -> Self {
        self.update_reachable = false;
        self
    }

    pub fn progress_calls(&self, job: &JobId) -> usize {
        self.progress_calls.lock().get(job).copied().unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub async fn wait_for_calls(&self, job: &JobId, count: usize) {
        loop {
            let called = self.called.notified();
            if self.progress_calls(job) >= count {
                return;
            }
            called.await;
        }
    }
}

#[async_trait]
impl DownloadService for ScriptedService {
    async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError> {
        self.requests.lock().push(format!("get_info {url}"));
        self.info
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Rejected("no info scripted".to_string())))
    }

    async fn start_download(&self, request: &DownloadRequest) -> Result<JobId, ClientError> {
        self.requests.lock().push(format!(
            "download {} {} {}",
            request.url, request.format, request.quality
        ));
        self.started
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Rejected("no job scripted".to_string())))
    }

    async fn job_progress(&self, job: &JobId) -> Result<JobProgress, ClientError> {
        let call = {
            let mut calls = self.progress_calls.lock();
            let count = calls.entry(job.clone()).or_insert(0);
            *count += 1;
            *count - 1
        };
        let response = (self.progress)(job, call);
        self.called.notify_waiters();
        response
    }

    async fn fetch_file(&self, job: &JobId) -> Result<DownloadedFile, ClientError> {
        self.requests.lock().push(format!("download_file {job}"));
        Ok(DownloadedFile {
            file_name: Some("Song.mp4".to_string()),
            bytes: Bytes::from_static(b"video"),
        })
    }

    async fn check_for_update(&self) -> Result<(), ClientError> {
        self.requests.lock().push("check_update".to_string());
        if self.update_reachable {
            Ok(())
        } else {
            Err(network_error())
        }
    }
}

/// Returns immediately, remembering every requested delay
#[derive(Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingScheduler {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().push(delay);
        tokio::task::yield_now().await;
    }
}

/// Never lets a delay elapse; only cancellation gets a poll past it
pub struct GatedScheduler;

#[async_trait]
impl Scheduler for GatedScheduler {
    async fn sleep(&self, _delay: Duration) {
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Started(JobId),
    Progress(JobId, ProgressView),
    Completed(Job),
    Failed(JobId, PollError),
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn events_for(&self, job: &JobId) -> Vec<SinkEvent> {
        self.events()
            .into_iter()
            .filter(|event| match event {
                SinkEvent::Started(id) | SinkEvent::Progress(id, _) | SinkEvent::Failed(id, _) => {
                    id == job
                }
                SinkEvent::Completed(done) => &done.id == job,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn started(&self, job: &JobId) {
        self.events.lock().push(SinkEvent::Started(job.clone()));
    }

    fn progress(&self, job: &JobId, view: &ProgressView) {
        self.events
            .lock()
            .push(SinkEvent::Progress(job.clone(), view.clone()));
    }

    fn completed(&self, job: &Job) {
        self.events.lock().push(SinkEvent::Completed(job.clone()));
    }

    fn failed(&self, job: &JobId, error: &PollError) {
        self.events
            .lock()
            .push(SinkEvent::Failed(job.clone(), error.clone()));
    }
}
