//! Common types for container providers

use serde::{Deserialize, Serialize};

/// Number of characters of a container ID shown in tables
pub const SHORT_ID_LEN: usize = 12;

/// Container ID wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContainerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Container provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Docker,
    Podman,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Docker => write!(f, "docker"),
            Self::Podman => write!(f, "podman"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "podman" => Ok(Self::Podman),
            _ => Err(format!("Unknown provider type: {}", s)),
        }
    }
}

/// Raw container state tag as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Restarting => write!(f, "restarting"),
            Self::Removing => write!(f, "removing"),
            Self::Exited => write!(f, "exited"),
            Self::Dead => write!(f, "dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for ContainerStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            _ => Self::Unknown,
        }
    }
}

/// A published port: host side and container side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
    /// Host port, `None` when the port is exposed but not published
    pub public: Option<u16>,
    pub private: u16,
}

impl std::fmt::Display for PortMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-->{}", self.public.unwrap_or(0), self.private)
    }
}

/// One row of the container list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub image: String,
    pub ports: Vec<PortMapping>,
    /// Human readable status, e.g. "Up 3 hours"
    pub status: String,
    /// Name aliases without the leading `/`
    pub names: Vec<String>,
    pub state: ContainerStatus,
}

impl ContainerSummary {
    pub fn is_running(&self) -> bool {
        self.state == ContainerStatus::Running
    }

    /// Ports rendered as `public-->private`, comma separated
    pub fn ports_display(&self) -> String {
        self.ports
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn names_display(&self) -> String {
        self.names.join(", ")
    }

    /// Name used in messages, falls back to the short ID
    pub fn display_name(&self) -> &str {
        self.names
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.id.short())
    }
}

/// Live resource usage of a single container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStats {
    pub id: ContainerId,
    pub name: String,
    /// Cumulative CPU time spent in kernel mode (nanoseconds)
    pub cpu_kernel_usage: u64,
    /// CPU usage since the previous sample, in percent of one core
    pub cpu_percent: f64,
    /// Memory usage in bytes
    pub memory_usage: u64,
    /// Memory limit in bytes (0 when unknown)
    pub memory_limit: u64,
    /// Number of processes in the container
    pub pids: u64,
}

impl ResourceStats {
    pub fn memory_mib(&self) -> u64 {
        self.memory_usage / (1024 * 1024)
    }
}

/// CPU percentage from two cumulative samples, the way `docker stats` computes it
pub fn cpu_percent(
    total_usage: u64,
    prev_total_usage: u64,
    system_usage: u64,
    prev_system_usage: u64,
    online_cpus: u64,
) -> f64 {
    let cpu_delta = total_usage.saturating_sub(prev_total_usage);
    let system_delta = system_usage.saturating_sub(prev_system_usage);
    if cpu_delta == 0 || system_delta == 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * online_cpus.max(1) as f64 * 100.0
}

/// Provider information
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub provider_type: ProviderType,
    pub api_version: String,
}
