// components/job_poller/src/scheduler.rs
use async_trait::async_trait;
use std::time::Duration;

/// Source of the delays between polls.
///
/// Dropping the returned future must cancel the pending delay.
#[async_trait]
pub trait Scheduler {
    async fn sleep(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
