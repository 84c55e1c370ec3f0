//! Docker provider implementation using bollard

use crate::{
    cpu_percent, ContainerId, ContainerProvider, ContainerStatus, ContainerSummary, PortMapping,
    ProviderError, ProviderInfo, ProviderType, ResourceStats, Result,
};
use async_trait::async_trait;
use bollard::container::{
    ListContainersOptions, RemoveContainerOptions, StartContainerOptions, Stats, StatsOptions,
    StopContainerOptions,
};
use bollard::Docker;
use futures::StreamExt;

/// Seconds bollard waits on the socket before giving up on its own
const CLIENT_TIMEOUT_SECS: u64 = 120;

/// Docker provider using bollard crate
pub struct DockerProvider {
    client: Docker,
    provider_type: ProviderType,
}

impl DockerProvider {
    /// Create a new Docker provider
    pub async fn new(socket_path: &str) -> Result<Self> {
        let connected = if socket_path.starts_with("http://") || socket_path.starts_with("https://") {
            Docker::connect_with_http(socket_path, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
        } else {
            let path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(path, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
        };
        let client = connected.map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        // Test connection
        client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            provider_type: ProviderType::Docker,
        })
    }

    /// Create a new provider for Podman (uses Docker-compatible API)
    pub async fn new_podman(socket_path: &str) -> Result<Self> {
        let mut provider = Self::new(socket_path).await?;
        provider.provider_type = ProviderType::Podman;
        Ok(provider)
    }
}

#[async_trait]
impl ContainerProvider for DockerProvider {
    async fn list(&self) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;

        Ok(containers.into_iter().map(summary_from_api).collect())
    }

    async fn stats(&self, id: &ContainerId) -> Result<ResourceStats> {
        // A non-streaming request still waits for two samples, so precpu is populated
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };
        let mut stream = self.client.stats(&id.0, Some(options));
        match stream.next().await {
            Some(Ok(stats)) => Ok(stats_from_api(id, stats)),
            Some(Err(e)) => Err(e.into()),
            None => Err(ProviderError::RuntimeError(format!(
                "no stats returned for {}",
                id.short()
            ))),
        }
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.client
            .start_container(&id.0, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &ContainerId, timeout: Option<u32>) -> Result<()> {
        let options = StopContainerOptions {
            t: timeout.unwrap_or(10) as i64,
        };
        self.client.stop_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.client.remove_container(&id.0, Some(options)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            provider_type: self.provider_type,
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
        }
    }
}

fn summary_from_api(c: bollard::models::ContainerSummary) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(c.id.unwrap_or_default()),
        image: c.image.unwrap_or_default(),
        ports: c
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortMapping {
                public: p.public_port,
                private: p.private_port,
            })
            .collect(),
        status: c.status.unwrap_or_default(),
        names: c
            .names
            .unwrap_or_default()
            .into_iter()
            .map(|n| n.trim_start_matches('/').to_string())
            .collect(),
        state: c
            .state
            .as_deref()
            .map(ContainerStatus::from)
            .unwrap_or(ContainerStatus::Unknown),
    }
}

fn stats_from_api(id: &ContainerId, stats: Stats) -> ResourceStats {
    let online_cpus = stats.cpu_stats.online_cpus.unwrap_or_else(|| {
        stats
            .cpu_stats
            .cpu_usage
            .percpu_usage
            .as_ref()
            .map(|p| p.len() as u64)
            .unwrap_or(1)
    });

    ResourceStats {
        id: id.clone(),
        name: stats.name.trim_start_matches('/').to_string(),
        cpu_kernel_usage: stats.cpu_stats.cpu_usage.usage_in_kernelmode,
        cpu_percent: cpu_percent(
            stats.cpu_stats.cpu_usage.total_usage,
            stats.precpu_stats.cpu_usage.total_usage,
            stats.cpu_stats.system_cpu_usage.unwrap_or(0),
            stats.precpu_stats.system_cpu_usage.unwrap_or(0),
            online_cpus,
        ),
        memory_usage: stats.memory_stats.usage.unwrap_or(0),
        memory_limit: stats.memory_stats.limit.unwrap_or(0),
        pids: stats.pids_stats.current.unwrap_or(0),
    }
}
