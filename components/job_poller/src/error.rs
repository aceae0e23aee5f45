use download_client::ClientError;
use download_protocol::ValidationError;
use thiserror::Error;

/// Why polling a job ended without a completed download
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// Reported by the service, either as an `error` payload or an `error` status
    #[error("{0}")]
    Server(String),

    #[error("Download timeout. Please try again.")]
    Timeout { polls: u32 },

    #[error("Failed to check download progress")]
    Unreachable { attempts: u32, last_error: String },

    #[error("Progress tracking was cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {context}")]
    Network {
        context: &'static str,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("No download is being tracked")]
    Idle,

    #[error("Progress task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ControllerError {
    /// Keep service rejections as-is; everything else is a network failure
    pub fn from_client(context: &'static str, error: ClientError) -> Self {
        match error {
            ClientError::Rejected(message) => ControllerError::Rejected(message),
            source => ControllerError::Network { context, source },
        }
    }
}
