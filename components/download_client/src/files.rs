// components/download_client/src/files.rs
use download_protocol::JobId;
use std::path::{Path, PathBuf};

use crate::error::ClientError;
use crate::service::DownloadService;

/// Pull the plain `filename=` parameter out of a `Content-Disposition` header
pub fn content_disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Fetch the artifact of a completed job and write it into `dir`.
///
/// The service-suggested name is sanitized; `<job id>.bin` is used when the
/// service does not suggest one.
pub async fn save_file<S>(service: &S, job: &JobId, dir: &Path) -> Result<PathBuf, ClientError>
where
    S: DownloadService + ?Sized,
{
    let file = service.fetch_file(job).await?;

    let name = file
        .file_name
        .as_deref()
        .map(sanitize_filename::sanitize)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{job}.bin"));

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, &file.bytes).await?;

    tracing::info!(job_id = %job, path = %path.display(), "Saved download");
    Ok(path)
}
