// components/download_client/src/lib.rs
mod error;
mod files;
mod http;
mod service;

pub use error::ClientError;
pub use files::{content_disposition_filename, save_file};
pub use http::HttpDownloadService;
pub use service::{DownloadService, DownloadedFile};
