//! Dashboard state shared by the refresh worker and the input path
//!
//! The container list is replaced wholesale on every refresh and the
//! selection is reconciled in the same critical section, so a reader never
//! sees a list together with a selection that points past its end.

use crate::selection::Selection;
use chrono::{DateTime, Local};
use dockdash_provider::{ContainerId, ContainerSummary, ProviderInfo, ResourceStats};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Result of one refresh tick, ready to be installed
#[derive(Debug, Clone)]
pub struct RefreshUpdate {
    /// Monotonic tick number; older updates are never installed over newer ones
    pub generation: u64,
    pub containers: Vec<ContainerSummary>,
    /// Stats fetched for the container expected to be selected, if any
    pub stats: Option<ResourceStats>,
}

/// In-memory view model of the dashboard
#[derive(Debug, Default)]
pub struct Dashboard {
    containers: Arc<Vec<ContainerSummary>>,
    selection: Selection,
    stats: Option<ResourceStats>,
    generation: u64,
    fetched: bool,
    last_refresh: Option<DateTime<Local>>,
    status_message: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard with an already installed list and selected row
    pub fn with_containers(containers: Vec<ContainerSummary>, selected_row: usize) -> Self {
        let selection = Selection::at(selected_row, containers.len());
        Self {
            containers: Arc::new(containers),
            selection,
            fetched: true,
            ..Self::default()
        }
    }

    pub fn containers(&self) -> &[ContainerSummary] {
        &self.containers
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// 1-based selected row, 0 for no selection
    pub fn selected_row(&self) -> usize {
        self.selection.row()
    }

    pub fn selected_container(&self) -> Option<&ContainerSummary> {
        self.selection.index().and_then(|i| self.containers.get(i))
    }

    /// Stats of the selected container. Stats that belong to another
    /// container (the selection moved since they were fetched) are hidden.
    pub fn stats(&self) -> Option<&ResourceStats> {
        let selected = self.selected_container()?;
        self.stats.as_ref().filter(|s| s.id == selected.id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether any snapshot has been installed yet
    pub fn has_snapshot(&self) -> bool {
        self.fetched
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn move_up(&mut self) -> bool {
        self.selection.move_up()
    }

    pub fn move_down(&mut self) -> bool {
        let count = self.container_count();
        self.selection.move_down(count)
    }

    /// Container that would be selected if `containers` were installed now
    pub fn prospective_target(&self, containers: &[ContainerSummary]) -> Option<ContainerId> {
        let mut selection = self.selection;
        selection.reconcile(self.list_was_empty(), containers.len());
        selection
            .index()
            .and_then(|i| containers.get(i))
            .map(|c| c.id.clone())
    }

    /// Install a refresh result: replace the list, clamp the selection and
    /// swap the stats. Returns false when the update is older than the
    /// installed snapshot and was dropped.
    pub fn install(&mut self, update: RefreshUpdate) -> bool {
        if self.fetched && update.generation <= self.generation {
            tracing::debug!(
                "Dropping refresh {} (installed: {})",
                update.generation,
                self.generation
            );
            return false;
        }

        let was_empty = self.list_was_empty();
        self.containers = Arc::new(update.containers);
        self.generation = update.generation;
        self.fetched = true;
        self.last_refresh = Some(Local::now());
        self.selection.reconcile(was_empty, self.containers.len());

        let previous = self.stats.take();
        self.stats = self.selected_container().map(|c| c.id.clone()).and_then(|id| {
            update
                .stats
                .filter(|s| s.id == id)
                .or_else(|| previous.filter(|s| s.id == id))
        });
        true
    }

    /// Immutable copy for the presenter
    pub fn view(&self) -> DashboardView {
        DashboardView {
            containers: Arc::clone(&self.containers),
            selected_row: self.selection.row(),
            stats: self.stats().cloned(),
            loaded: self.fetched,
            last_refresh: self.last_refresh,
            status_message: self.status_message.clone(),
            provider: None,
        }
    }

    fn list_was_empty(&self) -> bool {
        !self.fetched || self.containers.is_empty()
    }
}

/// Everything the presenter needs for one frame
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub containers: Arc<Vec<ContainerSummary>>,
    pub selected_row: usize,
    pub stats: Option<ResourceStats>,
    pub loaded: bool,
    pub last_refresh: Option<DateTime<Local>>,
    pub status_message: Option<String>,
    pub provider: Option<ProviderInfo>,
}

impl DashboardView {
    pub fn with_provider(mut self, provider: ProviderInfo) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// Dashboard behind the single lock both tasks go through
#[derive(Debug, Clone, Default)]
pub struct SharedDashboard(Arc<Mutex<Dashboard>>);

impl SharedDashboard {
    pub fn new(dashboard: Dashboard) -> Self {
        Self(Arc::new(Mutex::new(dashboard)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, Dashboard> {
        self.0.lock().await
    }

    pub async fn view(&self) -> DashboardView {
        self.0.lock().await.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockdash_provider::test_support::{mock_container, mock_stats};
    use dockdash_provider::{ContainerStatus, ProviderType};

    fn containers(names: &[&str]) -> Vec<ContainerSummary> {
        names
            .iter()
            .map(|n| mock_container(n, ContainerStatus::Running))
            .collect()
    }

    fn update(generation: u64, names: &[&str], stats_for: Option<&str>) -> RefreshUpdate {
        RefreshUpdate {
            generation,
            containers: containers(names),
            stats: stats_for.map(|id| mock_stats(&ContainerId::new(id))),
        }
    }

    #[test]
    fn test_new_dashboard_is_empty() {
        let dashboard = Dashboard::new();
        assert_eq!(dashboard.selected_row(), 0);
        assert_eq!(dashboard.container_count(), 0);
        assert!(dashboard.selected_container().is_none());
        assert!(!dashboard.has_snapshot());
    }

    #[test]
    fn test_first_install_selects_first_row() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.install(update(1, &["a", "b"], Some("a"))));
        assert_eq!(dashboard.selected_row(), 1);
        assert_eq!(dashboard.stats().unwrap().name, "a");
    }

    #[test]
    fn test_removed_container_moves_selection_up() {
        let mut dashboard = Dashboard::with_containers(containers(&["a", "b", "c"]), 3);
        assert_eq!(dashboard.selected_container().unwrap().id.0, "c");

        let target = dashboard.prospective_target(&containers(&["a", "b"]));
        assert_eq!(target, Some(ContainerId::new("b")));

        assert!(dashboard.install(update(1, &["a", "b"], Some("b"))));
        assert_eq!(dashboard.selected_row(), 2);
        assert_eq!(dashboard.selected_container().unwrap().id.0, "b");
        assert_eq!(dashboard.stats().unwrap().name, "b");
    }

    #[test]
    fn test_count_tracks_list_after_install() {
        let mut dashboard = Dashboard::with_containers(containers(&["a", "b", "c", "d"]), 4);
        dashboard.install(update(1, &["a"], None));
        assert_eq!(dashboard.container_count(), dashboard.containers().len());
        assert!(dashboard.selected_row() <= dashboard.container_count());
        assert_eq!(dashboard.selected_row(), 1);
    }

    #[test]
    fn test_emptied_list_clears_selection_and_stats() {
        let mut dashboard = Dashboard::new();
        dashboard.install(update(1, &["a"], Some("a")));
        dashboard.install(update(2, &[], None));
        assert_eq!(dashboard.selected_row(), 0);
        assert!(dashboard.stats().is_none());
        assert!(dashboard.view().stats.is_none());
    }

    #[test]
    fn test_empty_selection_hides_stats() {
        let mut dashboard = Dashboard::with_containers(containers(&["a"]), 0);
        // Even if stats for a container were delivered, no selection shows none
        dashboard.install(update(1, &["a"], Some("a")));
        assert_eq!(dashboard.selected_row(), 0);
        assert!(dashboard.stats().is_none());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.install(update(2, &["new"], None)));
        assert!(!dashboard.install(update(1, &["old", "older"], None)));
        assert_eq!(dashboard.containers()[0].id.0, "new");
        assert_eq!(dashboard.generation(), 2);
    }

    #[test]
    fn test_stats_for_other_container_are_discarded() {
        let mut dashboard = Dashboard::with_containers(containers(&["a", "b"]), 1);
        dashboard.install(update(1, &["a", "b"], Some("b")));
        assert!(dashboard.stats().is_none());
    }

    #[test]
    fn test_missing_stats_keep_previous_for_same_container() {
        let mut dashboard = Dashboard::new();
        dashboard.install(update(1, &["a", "b"], Some("a")));
        dashboard.install(update(2, &["a", "b"], None));
        assert_eq!(dashboard.stats().unwrap().name, "a");
    }

    #[test]
    fn test_moving_selection_hides_old_stats() {
        let mut dashboard = Dashboard::new();
        dashboard.install(update(1, &["a", "b"], Some("a")));
        assert!(dashboard.move_down());
        assert_eq!(dashboard.selected_row(), 2);
        assert!(dashboard.stats().is_none());
        assert!(dashboard.move_up());
        assert_eq!(dashboard.stats().unwrap().name, "a");
    }

    #[test]
    fn test_move_down_from_no_selection_is_noop() {
        let mut dashboard = Dashboard::with_containers(containers(&["a"]), 0);
        assert!(!dashboard.move_down());
        assert_eq!(dashboard.selected_row(), 0);
    }

    #[test]
    fn test_view_copies_state() {
        let mut dashboard = Dashboard::new();
        dashboard.install(update(1, &["a", "b"], Some("a")));
        dashboard.set_status("Stopping a");

        let view = dashboard.view().with_provider(ProviderInfo {
            provider_type: ProviderType::Podman,
            api_version: "1.41".to_string(),
        });
        assert_eq!(view.containers.len(), 2);
        assert_eq!(view.selected_row, 1);
        assert!(view.loaded);
        assert!(view.last_refresh.is_some());
        assert_eq!(view.status_message.as_deref(), Some("Stopping a"));
        let provider = view.provider.unwrap();
        assert_eq!(provider.provider_type, ProviderType::Podman);
        assert_eq!(provider.api_version, "1.41");
    }
}
