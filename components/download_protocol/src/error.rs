use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid YouTube URL")]
    Empty,

    #[error("Please enter a valid YouTube URL")]
    InvalidUrl(String),
}
