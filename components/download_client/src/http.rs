// components/download_client/src/http.rs
//! `reqwest` implementation of [`DownloadService`] against the download
//! service's JSON endpoints.

use async_trait::async_trait;
use download_protocol::{
    DownloadRequest, DownloadTicket, InfoRequest, JobId, JobProgress, Reply, VideoInfo,
};
use reqwest::header::CONTENT_DISPOSITION;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ClientError;
use crate::files::content_disposition_filename;
use crate::service::{DownloadService, DownloadedFile};

#[derive(Debug, Clone)]
pub struct HttpDownloadService {
    client: reqwest::Client,
    base: Url,
}

impl HttpDownloadService {
    /// Create a client for the service rooted at `base`, e.g. `http://host:5000`.
    pub fn new(base: Url) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("download-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, base)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, base: Url) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::Protocol(format!(
                "{base} cannot be used as a service URL"
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Where the finished artifact of `job` can be fetched
    pub fn file_url(&self, job: &JobId) -> Result<Url, ClientError> {
        self.endpoint(&["download_file", job.as_str()])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::Protocol(format!("{} cannot be used as a service URL", self.base))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Decode a `{error}`-or-payload reply.
    ///
    /// An `error` payload wins regardless of the HTTP status; a payload on a
    /// non-2xx status is still treated as a failed request.
    async fn parse_reply<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Reply<T>>(&body) {
            Ok(Reply::Rejected { error }) => Err(ClientError::Rejected(error)),
            Ok(Reply::Accepted(value)) if status.is_success() => Ok(value),
            Ok(Reply::Accepted(_)) => Err(Self::status_error(status, &body)),
            Err(_) if !status.is_success() => Err(Self::status_error(status, &body)),
            Err(e) => Err(ClientError::Protocol(e.to_string())),
        }
    }

    fn status_error(status: reqwest::StatusCode, body: &[u8]) -> ClientError {
        ClientError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

#[async_trait]
impl DownloadService for HttpDownloadService {
    async fn video_info(&self, url: &str) -> Result<VideoInfo, ClientError> {
        let request = InfoRequest {
            url: url.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["get_info"])?)
            .json(&request)
            .send()
            .await?;

        Self::parse_reply(response).await
    }

    async fn start_download(&self, request: &DownloadRequest) -> Result<JobId, ClientError> {
        let response = self
            .client
            .post(self.endpoint(&["download"])?)
            .json(request)
            .send()
            .await?;

        let ticket: DownloadTicket = Self::parse_reply(response).await?;
        tracing::info!(
            job_id = %ticket.download_id,
            note = ticket.message.as_deref().unwrap_or_default(),
            "Download job accepted"
        );
        Ok(JobId::new(ticket.download_id))
    }

    async fn job_progress(&self, job: &JobId) -> Result<JobProgress, ClientError> {
        let response = self
            .client
            .get(self.endpoint(&["progress", job.as_str()])?)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let snapshot: JobProgress = match serde_json::from_slice(&body) {
            Ok(snapshot) => snapshot,
            Err(_) if !status.is_success() => return Err(Self::status_error(status, &body)),
            Err(e) => return Err(ClientError::Protocol(e.to_string())),
        };

        if !status.is_success() && snapshot.reported_error().is_none() {
            return Err(Self::status_error(status, &body));
        }
        Ok(snapshot)
    }

    async fn fetch_file(&self, job: &JobId) -> Result<DownloadedFile, ClientError> {
        let response = self
            .client
            .get(self.file_url(job)?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.bytes().await?;
            return Err(match serde_json::from_slice::<Reply<serde_json::Value>>(&body) {
                Ok(Reply::Rejected { error }) => ClientError::Rejected(error),
                _ => Self::status_error(status, &body),
            });
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename);
        let bytes = response.bytes().await?;
        tracing::debug!(job_id = %job, size = bytes.len(), "Fetched download artifact");

        Ok(DownloadedFile { file_name, bytes })
    }

    async fn check_for_update(&self) -> Result<(), ClientError> {
        self.client
            .get(self.endpoint(&["check_update"])?)
            .send()
            .await?;
        Ok(())
    }
}
