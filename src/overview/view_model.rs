use crate::models::Property;
use crate::network::{MarsApiFilter, MarsApiService};
use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Lifecycle of the most recent fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Error,
    Done,
}

/// State shared between the view model and its in-flight fetches
struct OverviewState {
    service: Arc<dyn MarsApiService>,
    status: watch::Sender<Option<FetchStatus>>,
    properties: watch::Sender<Vec<Arc<Property>>>,
    /// Token of the newest fetch; older completions are dropped
    generation: Mutex<u64>,
}

impl OverviewState {
    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> u64 {
        let mut current = self.generation();
        *current += 1;
        self.status.send_replace(Some(FetchStatus::Loading));
        *current
    }

    fn complete(&self, generation: u64, filter: MarsApiFilter, result: Result<Vec<Property>>) {
        let current = self.generation();
        if *current != generation {
            debug!(
                "Discarding stale fetch #{} (filter={}), newest is #{}",
                generation, filter, *current
            );
            return;
        }

        match result {
            Ok(list) => {
                info!("Fetch #{} done with {} properties", generation, list.len());
                self.status.send_replace(Some(FetchStatus::Done));
                self.properties
                    .send_replace(list.into_iter().map(Arc::new).collect());
            }
            Err(e) => {
                warn!("Fetch #{} failed: {:#}", generation, e);
                self.status.send_replace(Some(FetchStatus::Error));
                self.properties.send_replace(Vec::new());
            }
        }
    }
}

/// View state for the overview grid: fetch status, the listed properties and
/// the one-shot "navigate to this property" signal.
///
/// Callers only ever see read-only `watch::Receiver`s. Fetches run on spawned
/// tasks owned by the view model; dropping it abandons whatever is in flight.
pub struct OverviewViewModel {
    state: Arc<OverviewState>,
    navigate_to_selected_property: watch::Sender<Option<Arc<Property>>>,
    fetches: Mutex<JoinSet<()>>,
}

impl OverviewViewModel {
    /// Create the view model and start loading every listing.
    /// Must be called from within a tokio runtime.
    pub fn new(service: Arc<dyn MarsApiService>) -> Self {
        let (status, _) = watch::channel(None);
        let (properties, _) = watch::channel(Vec::new());
        let (navigate_to_selected_property, _) = watch::channel(None);

        let view_model = Self {
            state: Arc::new(OverviewState {
                service,
                status,
                properties,
                generation: Mutex::new(0),
            }),
            navigate_to_selected_property,
            fetches: Mutex::new(JoinSet::new()),
        };

        view_model.trigger_fetch(MarsApiFilter::ShowAll);
        view_model
    }

    pub fn status(&self) -> watch::Receiver<Option<FetchStatus>> {
        self.state.status.subscribe()
    }

    pub fn properties(&self) -> watch::Receiver<Vec<Arc<Property>>> {
        self.state.properties.subscribe()
    }

    pub fn navigate_to_selected_property(&self) -> watch::Receiver<Option<Arc<Property>>> {
        self.navigate_to_selected_property.subscribe()
    }

    /// Mark the status LOADING right away, then fetch in the background.
    /// Only the most recently triggered fetch may update the state.
    pub fn trigger_fetch(&self, filter: MarsApiFilter) {
        let generation = self.state.begin();
        debug!("Starting fetch #{} (filter={})", generation, filter);

        let state = Arc::clone(&self.state);
        let mut fetches = self.fetches.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        while fetches.try_join_next().is_some() {}
        fetches.spawn(async move {
            let result = state.service.get_properties(filter).await;
            state.complete(generation, filter, result);
        });
    }

    /// Signal that the detail view for `property` should be shown
    pub fn select_property(&self, property: Arc<Property>) {
        self.navigate_to_selected_property.send_replace(Some(property));
    }

    /// Clear the navigation signal once the detail view is up, so coming
    /// back to the grid does not navigate again
    pub fn acknowledge_selection(&self) {
        self.navigate_to_selected_property.send_replace(None);
    }
}
