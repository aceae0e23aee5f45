// components/job_poller/src/config.rs
use std::time::Duration;

/// Timing and limits of the progress poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Delay after a successful, non-terminal response
    pub interval: Duration,

    /// Delay after a failed request
    pub retry_interval: Duration,

    /// Successful non-terminal responses tolerated before timing out
    pub max_polls: u32,

    /// Consecutive failed requests tolerated before giving up
    pub max_consecutive_failures: u32,
}

impl PollerConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(2000);
    pub const DEFAULT_MAX_POLLS: u32 = 300;
    pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 10;
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            retry_interval: Self::DEFAULT_RETRY_INTERVAL,
            max_polls: Self::DEFAULT_MAX_POLLS,
            max_consecutive_failures: Self::DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}
