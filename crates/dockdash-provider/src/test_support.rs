//! Test support utilities for dockdash-provider
//!
//! Provides MockProvider and helpers for testing the dashboard without
//! requiring a real Docker/Podman runtime.

use crate::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List,
    Stats { id: String },
    Start { id: String },
    Stop { id: String },
    Remove { id: String, force: bool },
    Ping,
}

/// Configurable mock container provider for testing
///
/// Calls can be held in flight with a gate: a semaphore with no permits that
/// the test releases with `add_permits` when it wants the call to finish.
pub struct MockProvider {
    pub provider_type: ProviderType,
    /// Calls in the order they were entered
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Calls that got past their gate and returned
    pub completed: Arc<Mutex<Vec<MockCall>>>,
    /// Result for list calls
    pub list_result: Arc<Mutex<Result<Vec<ContainerSummary>>>>,
    /// Error for stats calls (if None, stats are synthesized from the ID)
    pub stats_error: Arc<Mutex<Option<ProviderError>>>,
    /// Result for start, stop and remove calls
    pub action_result: Arc<Mutex<Result<()>>>,
    /// Result for ping calls
    pub ping_result: Arc<Mutex<Result<()>>>,
    list_gate: Mutex<Option<Arc<Semaphore>>>,
    stats_gate: Mutex<Option<Arc<Semaphore>>>,
    action_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty container list
    pub fn new(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            calls: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(Mutex::new(Vec::new())),
            list_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            stats_error: Arc::new(Mutex::new(None)),
            action_result: Arc::new(Mutex::new(Ok(()))),
            ping_result: Arc::new(Mutex::new(Ok(()))),
            list_gate: Mutex::new(None),
            stats_gate: Mutex::new(None),
            action_gate: Mutex::new(None),
        }
    }

    /// Replace the list returned by the next `list` calls
    pub fn set_containers(&self, containers: Vec<ContainerSummary>) {
        *self.list_result.lock().unwrap() = Ok(containers);
    }

    /// Make `list` fail until `set_containers` is called again
    pub fn fail_list(&self, message: &str) {
        *self.list_result.lock().unwrap() = Err(ProviderError::RuntimeError(message.to_string()));
    }

    pub fn fail_stats(&self, message: &str) {
        *self.stats_error.lock().unwrap() = Some(ProviderError::RuntimeError(message.to_string()));
    }

    pub fn fail_actions(&self, message: &str) {
        *self.action_result.lock().unwrap() = Err(ProviderError::RuntimeError(message.to_string()));
    }

    /// Hold every following `list` call until the returned gate gets a permit
    pub fn gate_list(&self) -> Arc<Semaphore> {
        install_gate(&self.list_gate)
    }

    pub fn gate_stats(&self) -> Arc<Semaphore> {
        install_gate(&self.stats_gate)
    }

    /// Hold start, stop and remove calls until the returned gate gets a permit
    pub fn gate_actions(&self) -> Arc<Semaphore> {
        install_gate(&self.action_gate)
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn complete(&self, call: MockCall) {
        self.completed.lock().unwrap().push(call);
    }

    /// Forget every call recorded so far, entered or completed
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.completed.lock().unwrap().clear();
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completed_calls(&self) -> Vec<MockCall> {
        self.completed.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn was_called(&self, call: &MockCall) -> bool {
        self.calls.lock().unwrap().contains(call)
    }

    /// Number of `list` calls entered so far
    pub fn list_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == MockCall::List)
            .count()
    }

    async fn run_action(&self, call: MockCall) -> Result<()> {
        self.record(call.clone());
        pass_gate(&self.action_gate).await;
        let result = clone_result(&self.action_result);
        self.complete(call);
        result
    }
}

fn install_gate(slot: &Mutex<Option<Arc<Semaphore>>>) -> Arc<Semaphore> {
    let gate = Arc::new(Semaphore::new(0));
    *slot.lock().unwrap() = Some(gate.clone());
    gate
}

async fn pass_gate(slot: &Mutex<Option<Arc<Semaphore>>>) {
    let gate = slot.lock().unwrap().clone();
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_provider_error(e)),
    }
}

/// Clone a ProviderError (thiserror types don't implement Clone)
fn clone_provider_error(e: &ProviderError) -> ProviderError {
    match e {
        ProviderError::ConnectionError(s) => ProviderError::ConnectionError(s.clone()),
        ProviderError::ContainerNotFound(s) => ProviderError::ContainerNotFound(s.clone()),
        ProviderError::RuntimeError(s) => ProviderError::RuntimeError(s.clone()),
        ProviderError::ConfigError(s) => ProviderError::ConfigError(s.clone()),
        ProviderError::Timeout(op) => ProviderError::Timeout(op),
        ProviderError::IoError(_) => ProviderError::RuntimeError("IO error (cloned)".into()),
    }
}

/// Create a mock container whose ID and single name are both `name`
pub fn mock_container(name: &str, state: ContainerStatus) -> ContainerSummary {
    ContainerSummary {
        id: ContainerId::new(name),
        image: format!("{}:latest", name),
        ports: Vec::new(),
        status: match state {
            ContainerStatus::Running => "Up 1 minute".to_string(),
            other => other.to_string(),
        },
        names: vec![name.to_string()],
        state,
    }
}

/// Create mock stats named after the container ID
pub fn mock_stats(id: &ContainerId) -> ResourceStats {
    ResourceStats {
        id: id.clone(),
        name: id.0.clone(),
        cpu_kernel_usage: 1_000,
        cpu_percent: 1.5,
        memory_usage: 64 * 1024 * 1024,
        memory_limit: 512 * 1024 * 1024,
        pids: 3,
    }
}

#[async_trait]
impl ContainerProvider for MockProvider {
    async fn list(&self) -> Result<Vec<ContainerSummary>> {
        self.record(MockCall::List);
        pass_gate(&self.list_gate).await;
        let result = clone_result(&self.list_result);
        self.complete(MockCall::List);
        result
    }

    async fn stats(&self, id: &ContainerId) -> Result<ResourceStats> {
        let call = MockCall::Stats { id: id.0.clone() };
        self.record(call.clone());
        pass_gate(&self.stats_gate).await;
        self.complete(call);
        if let Some(err) = self.stats_error.lock().unwrap().as_ref() {
            return Err(clone_provider_error(err));
        }
        Ok(mock_stats(id))
    }

    async fn start(&self, id: &ContainerId) -> Result<()> {
        self.run_action(MockCall::Start { id: id.0.clone() }).await
    }

    async fn stop(&self, id: &ContainerId, _timeout: Option<u32>) -> Result<()> {
        self.run_action(MockCall::Stop { id: id.0.clone() }).await
    }

    async fn remove(&self, id: &ContainerId, force: bool) -> Result<()> {
        self.run_action(MockCall::Remove {
            id: id.0.clone(),
            force,
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.record(MockCall::Ping);
        clone_result(&self.ping_result)
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            provider_type: self.provider_type,
            api_version: "mock".to_string(),
        }
    }
}
