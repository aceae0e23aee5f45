// components/download_protocol/src/lib.rs
mod display;
mod error;
mod job;
mod protocol;
mod validation;

pub use display::format_view_count;
pub use error::ValidationError;
pub use job::{Job, JobId, JobStatus};
pub use protocol::{
    DownloadRequest, DownloadTicket, Format, InfoRequest, JobProgress, Quality, Reply, VideoInfo,
};
pub use validation::validate_url;
