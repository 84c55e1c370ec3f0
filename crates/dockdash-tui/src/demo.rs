//! Demo mode: an in-memory runtime so the dashboard can run without a daemon

use async_trait::async_trait;
use dockdash_provider::{
    ContainerId, ContainerProvider, ContainerStatus, ContainerSummary, PortMapping, ProviderError,
    ProviderInfo, ProviderType, ResourceStats, Result,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Fake container runtime with a few sample containers.
///
/// Start and stop flip the container state, remove drops it from the list.
/// Stats are synthetic and change a little with every sample.
pub struct DemoProvider {
    containers: Mutex<Vec<ContainerSummary>>,
    samples: AtomicU64,
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    pub fn new() -> Self {
        let containers = vec![
            demo_container(
                "3f2a9c81b7d04e6f",
                "nginx:1.25",
                vec![port(Some(8080), 80), port(Some(8443), 443)],
                &["web"],
                ContainerStatus::Running,
            ),
            demo_container(
                "a81c44d09e5b7f21",
                "postgres:16",
                vec![port(Some(5432), 5432)],
                &["db", "primary"],
                ContainerStatus::Running,
            ),
            demo_container(
                "c09b7e13aa46d852",
                "redis:7-alpine",
                vec![port(None, 6379)],
                &["cache"],
                ContainerStatus::Exited,
            ),
            demo_container(
                "e7d1520f3c98ab04",
                "busybox:latest",
                Vec::new(),
                &["scratch"],
                ContainerStatus::Created,
            ),
        ];

        Self {
            containers: Mutex::new(containers),
            samples: AtomicU64::new(0),
        }
    }

    fn with_container<T>(
        &self,
        id: &ContainerId,
        f: impl FnOnce(&mut Vec<ContainerSummary>, usize) -> T,
    ) -> Result<T> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|_| ProviderError::RuntimeError("demo state poisoned".to_string()))?;
        let index = containers
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ProviderError::ContainerNotFound(id.0.clone()))?;
        Ok(f(&mut containers, index))
    }
}

fn port(public: Option<u16>, private: u16) -> PortMapping {
    PortMapping { public, private }
}

fn demo_container(
    id: &str,
    image: &str,
    ports: Vec<PortMapping>,
    names: &[&str],
    state: ContainerStatus,
) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(id),
        image: image.to_string(),
        ports,
        status: status_text(state),
        names: names.iter().map(|n| n.to_string()).collect(),
        state,
    }
}

fn status_text(state: ContainerStatus) -> String {
    match state {
        ContainerStatus::Running => "Up 2 hours".to_string(),
        ContainerStatus::Exited => "Exited (0) 5 minutes ago".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ContainerProvider for DemoProvider {
    async fn list(&self) -> Result<Vec<ContainerSummary>> {
        self.containers
            .lock()
            .map(|c| c.clone())
            .map_err(|_| ProviderError::RuntimeError("demo state poisoned".to_string()))
    }

    async fn stats(&self, id: &ContainerId) -> Result<ResourceStats> {
        let sample = self.samples.fetch_add(1, Ordering::Relaxed);
        self.with_container(id, |containers, index| {
            let container = &containers[index];
            let running = container.is_running();
            let seed = index as u64 + 1;
            ResourceStats {
                id: container.id.clone(),
                name: container.display_name().to_string(),
                cpu_kernel_usage: if running { seed * 1_000_000 + sample * 4_000 } else { 0 },
                cpu_percent: if running {
                    (seed * 3 + sample % 7) as f64 / 2.0
                } else {
                    0.0
                },
                memory_usage: if running { (seed * 48 + sample % 5) * 1024 * 1024 } else { 0 },
                memory_limit: 2 * 1024 * 1024 * 1024,
                pids: if running { seed * 2 + 1 } else { 0 },
            }
        })
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.with_container(id, |containers, index| {
            let container = &mut containers[index];
            container.state = ContainerStatus::Running;
            container.status = "Up Less than a second".to_string();
        })
    }

    async fn stop(&self, id: &ContainerId, _timeout: Option<u32>) -> Result<()> {
        self.with_container(id, |containers, index| {
            let container = &mut containers[index];
            container.state = ContainerStatus::Exited;
            container.status = "Exited (0) Less than a second ago".to_string();
        })
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        self.with_container(id, |containers, index| {
            if containers[index].is_running() && !force {
                return Err(ProviderError::RuntimeError(format!(
                    "container {} is running, stop it or force removal",
                    id.short()
                )));
            }
            containers.remove(index);
            Ok(())
        })?
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            provider_type: ProviderType::Docker,
            api_version: "demo".to_string(),
        }
    }
}
