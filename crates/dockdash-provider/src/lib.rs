//! Container provider trait and implementations for dockdash
//!
//! This crate provides an abstraction over container runtimes (Docker, Podman)
//! with the handful of operations the dashboard needs: listing, per-container
//! stats, and start/stop/remove.

mod docker;
mod error;
#[cfg(feature = "test-support")]
pub mod test_support;
mod timeout;
mod types;

pub use docker::DockerProvider;
pub use error::*;
pub use timeout::TimeoutProvider;
pub use types::*;

use async_trait::async_trait;
use dockdash_config::GlobalConfig;

/// Trait for container providers (Docker, Podman, etc.)
#[async_trait]
pub trait ContainerProvider: Send + Sync {
    /// List all containers, running or not
    async fn list(&self) -> Result<Vec<ContainerSummary>>;

    /// Take one resource usage sample of a container
    async fn stats(&self, id: &ContainerId) -> Result<ResourceStats>;

    /// Start a container
    async fn start(&self, id: &ContainerId) -> Result<()>;

    /// Stop a container
    async fn stop(&self, id: &ContainerId, timeout: Option<u32>) -> Result<()>;

    /// Remove a container
    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()>;

    /// Check if the provider is available/connected
    async fn ping(&self) -> Result<()>;

    /// Get provider information
    fn info(&self) -> ProviderInfo;
}

/// Factory function to create a provider based on type
pub async fn create_provider(
    provider_type: ProviderType,
    config: &GlobalConfig,
) -> Result<Box<dyn ContainerProvider>> {
    let socket = socket_for(provider_type, config);
    let provider = match provider_type {
        ProviderType::Docker => DockerProvider::new(socket).await,
        // Podman serves the Docker-compatible API on its socket
        ProviderType::Podman => DockerProvider::new_podman(socket).await,
    };

    match provider {
        Ok(provider) => Ok(Box::new(provider)),
        Err(e) => {
            let socket_exists = std::path::Path::new(socket.trim_start_matches("unix://")).exists();
            Err(ProviderError::ConnectionError(format_connection_error(
                provider_type,
                socket,
                socket_exists,
                &e,
            )))
        }
    }
}

/// Create the provider named in the config, Docker when none is set
pub async fn create_default_provider(config: &GlobalConfig) -> Result<Box<dyn ContainerProvider>> {
    let provider_type = match config.defaults.provider.as_str() {
        "" => ProviderType::Docker,
        other => other.parse().map_err(ProviderError::ConfigError)?,
    };
    tracing::info!("Using {} provider", provider_type);
    create_provider(provider_type, config).await
}

fn socket_for(provider_type: ProviderType, config: &GlobalConfig) -> &str {
    match provider_type {
        ProviderType::Podman => &config.providers.podman.socket,
        ProviderType::Docker => &config.providers.docker.socket,
    }
}

/// Format a helpful connection error message with actionable instructions
fn format_connection_error(
    provider: ProviderType,
    socket_path: &str,
    socket_exists: bool,
    underlying: &ProviderError,
) -> String {
    let provider_name = match provider {
        ProviderType::Podman => "Podman",
        ProviderType::Docker => "Docker",
    };

    let mut msg = format!("Cannot connect to {}\n\n", provider_name);

    if !socket_exists {
        msg.push_str(&format!(
            "The {} API socket was not found at:\n  {}\n\n",
            provider_name, socket_path
        ));

        match provider {
            ProviderType::Podman => {
                msg.push_str("To enable the Podman socket, run:\n");
                msg.push_str("  systemctl --user enable --now podman.socket\n");
            }
            ProviderType::Docker => {
                msg.push_str("To start Docker, run:\n");
                msg.push_str("  sudo systemctl enable --now docker\n");
            }
        }
    } else {
        msg.push_str(&format!(
            "The socket exists at {} but the daemon is not responding.\n\n",
            socket_path
        ));
        msg.push_str(&format!("Underlying error: {}\n", underlying));
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_missing_socket() {
        let msg = format_connection_error(
            ProviderType::Podman,
            "/nope/podman.sock",
            false,
            &ProviderError::ConnectionError("refused".to_string()),
        );
        assert!(msg.contains("Cannot connect to Podman"));
        assert!(msg.contains("/nope/podman.sock"));
        assert!(msg.contains("podman.socket"));
        assert!(!msg.contains("refused"));
    }

    #[test]
    fn test_connection_error_daemon_down() {
        let msg = format_connection_error(
            ProviderType::Docker,
            "/var/run/docker.sock",
            true,
            &ProviderError::ConnectionError("refused".to_string()),
        );
        assert!(msg.contains("not responding"));
        assert!(msg.contains("refused"));
    }

    #[test]
    fn test_socket_for() {
        let mut config = GlobalConfig::default();
        config.providers.docker.socket = "/d.sock".to_string();
        config.providers.podman.socket = "/p.sock".to_string();
        assert_eq!(socket_for(ProviderType::Docker, &config), "/d.sock");
        assert_eq!(socket_for(ProviderType::Podman, &config), "/p.sock");
    }
}
