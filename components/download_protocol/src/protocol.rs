// components/download_protocol/src/protocol.rs
use crate::job::JobStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container format requested from the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Mp4,
    Mp3,
    M4a,
}

impl Format {
    pub fn is_audio(&self) -> bool {
        matches!(self, Format::Mp3 | Format::M4a)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Mp4 => write!(f, "mp4"),
            Format::Mp3 => write!(f, "mp3"),
            Format::M4a => write!(f, "m4a"),
        }
    }
}

/// Video quality; ignored by the service for audio formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "worst")]
    Worst,
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => write!(f, "best"),
            Quality::P720 => write!(f, "720p"),
            Quality::P480 => write!(f, "480p"),
            Quality::P360 => write!(f, "360p"),
            Quality::Worst => write!(f, "worst"),
        }
    }
}

/// Body of `POST /get_info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoRequest {
    pub url: String,
}

/// Body of `POST /download`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: Format,
    pub quality: Quality,
}

/// Metadata returned by `POST /get_info`.
///
/// The service forwards whatever the extractor found, so anything but the
/// formatted duration may come back as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    /// Already formatted by the service, e.g. `"3:07"` or `"Unknown"`
    pub duration: String,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Successful answer of `POST /download`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadTicket {
    pub download_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Snapshot returned by `GET /progress/{id}`.
///
/// Every field is optional on the wire: an unknown job comes back as a bare
/// `{"error": ...}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Percentage as reported; may overshoot 100 on estimated sizes
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobProgress {
    /// Server error carried in the payload, ignoring empty strings
    pub fn reported_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Service replies either carry the expected payload or an `error` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reply<T> {
    Rejected { error: String },
    Accepted(T),
}
