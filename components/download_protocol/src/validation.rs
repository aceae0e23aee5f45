// components/download_protocol/src/validation.rs
use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+$")
        .expect("video url pattern is a valid regex")
});

/// Check that `url` points at a video page the download service accepts.
///
/// Surrounding whitespace is ignored; the trimmed URL is returned on success.
pub fn validate_url(url: &str) -> Result<&str, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !VIDEO_URL.is_match(url) {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }
    Ok(url)
}
