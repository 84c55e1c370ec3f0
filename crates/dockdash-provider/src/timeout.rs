//! Upper bound on runtime calls
//!
//! The Docker API has no deadline of its own for most endpoints, so a wedged
//! daemon would stall the refresh loop forever. Every call made through
//! [`TimeoutProvider`] fails with [`ProviderError::Timeout`] instead.

use crate::{
    ContainerId, ContainerProvider, ContainerSummary, ProviderError, ProviderInfo, ResourceStats,
    Result,
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wraps another provider and bounds each call by a fixed timeout
pub struct TimeoutProvider {
    inner: Arc<dyn ContainerProvider>,
    timeout: Duration,
}

impl TimeoutProvider {
    pub fn new(inner: Arc<dyn ContainerProvider>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(&self, op: &'static str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("{} exceeded {:?}", op, self.timeout);
                Err(ProviderError::Timeout(op))
            }
        }
    }
}

#[async_trait]
impl ContainerProvider for TimeoutProvider {
    async fn list(&self) -> Result<Vec<ContainerSummary>> {
        self.bounded("list", self.inner.list()).await
    }

    async fn stats(&self, id: &ContainerId) -> Result<ResourceStats> {
        self.bounded("stats", self.inner.stats(id)).await
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.bounded("start", self.inner.start(id)).await
    }

    async fn stop(&self, id: &ContainerId, timeout: Option<u32>) -> Result<()> {
        // Stopping waits for the container's own grace period first
        let grace = Duration::from_secs(u64::from(timeout.unwrap_or(10)));
        match tokio::time::timeout(self.timeout + grace, self.inner.stop(id, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout("stop")),
        }
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        self.bounded("remove", self.inner.remove(id, force)).await
    }

    async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.inner.ping()).await
    }

    fn info(&self) -> ProviderInfo {
        self.inner.info()
    }
}
