//! Background refresh of the container list and selected container stats
//!
//! A single long-lived worker fetches on a fixed interval. Runtime I/O happens
//! without holding the dashboard lock; the lock is only taken to look up the
//! container that will be selected and to install the finished update.

use crate::dashboard::{RefreshUpdate, SharedDashboard};
use crate::event::Event;
use dockdash_provider::ContainerProvider;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::instrument::WithSubscriber;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new snapshot was installed
    Installed,
    /// Listing failed, the previous snapshot is kept
    FetchFailed,
    /// Another tick was still in flight
    Skipped,
    /// A newer snapshot was installed while this one was being fetched
    Stale,
}

/// Performs refresh ticks against a provider, at most one at a time
pub struct Refresher {
    provider: Arc<dyn ContainerProvider>,
    dashboard: SharedDashboard,
    in_flight: AtomicBool,
    generation: AtomicU64,
}

/// Clears the in-flight flag when the tick ends, even if it is aborted
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Refresher {
    pub fn new(provider: Arc<dyn ContainerProvider>, dashboard: SharedDashboard) -> Self {
        Self {
            provider,
            dashboard,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Option<FlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(&self.in_flight))
    }

    /// Fetch the list, fetch stats for the container that will be selected,
    /// then install both in one critical section.
    pub async fn tick(&self) -> TickOutcome {
        let Some(_guard) = self.begin() else {
            tracing::debug!("Refresh still in flight, skipping tick");
            return TickOutcome::Skipped;
        };
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let containers = match self.provider.list().await {
            Ok(containers) => containers,
            Err(e) => {
                tracing::warn!("Failed to list containers: {}", e);
                return TickOutcome::FetchFailed;
            }
        };

        let target = self.dashboard.lock().await.prospective_target(&containers);
        let stats = match target {
            Some(id) => match self.provider.stats(&id).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::warn!("Failed to fetch stats for {}: {}", id.short(), e);
                    None
                }
            },
            None => None,
        };

        let count = containers.len();
        let installed = self.dashboard.lock().await.install(RefreshUpdate {
            generation,
            containers,
            stats,
        });

        if installed {
            tracing::debug!("Refresh {} installed {} containers", generation, count);
            TickOutcome::Installed
        } else {
            TickOutcome::Stale
        }
    }
}

/// Requests an early refresh from the worker
#[derive(Debug, Clone)]
pub struct RefreshRequester(mpsc::UnboundedSender<()>);

impl RefreshRequester {
    pub fn request(&self) {
        // The worker being gone only happens during shutdown
        let _ = self.0.send(());
    }
}

/// Handle to the running refresh worker
pub struct RefreshWorker {
    requests: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl RefreshWorker {
    /// Spawn the worker. It ticks immediately, then every `interval`, and
    /// sends `Event::Refreshed` after each installed snapshot. The task logs
    /// through the subscriber that is current when it is spawned.
    pub fn spawn(
        refresher: Arc<Refresher>,
        interval: Duration,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    request = rx.recv() => {
                        if request.is_none() {
                            break;
                        }
                    }
                }

                if refresher.tick().await == TickOutcome::Installed
                    && events.send(Event::Refreshed).is_err()
                {
                    // Receiver dropped, the app is gone
                    break;
                }
            }
        }
        .with_current_subscriber());

        Self { requests: tx, task }
    }

    pub fn requester(&self) -> RefreshRequester {
        RefreshRequester(self.requests.clone())
    }

    /// Stop the worker without waiting for a tick in flight
    pub fn shutdown(self) {
        self.task.abort();
    }
}
