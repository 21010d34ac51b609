//! Shared application state for axum handlers.

use std::sync::Arc;

use tokio::sync::watch;

use planner_app::ports::ScheduleStore;
use planner_app::services::ScheduleService;
use planner_app::sync_loop::SyncStatus;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`.
pub struct AppState<S> {
    pub schedule_service: Arc<ScheduleService<S>>,
    /// Latest status published by the sync loop.
    pub sync_status: watch::Receiver<SyncStatus>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            schedule_service: Arc::clone(&self.schedule_service),
            sync_status: self.sync_status.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    pub fn new(
        schedule_service: ScheduleService<S>,
        sync_status: watch::Receiver<SyncStatus>,
    ) -> Self {
        Self::from_arcs(Arc::new(schedule_service), sync_status)
    }

    /// Use this when the service is shared with other tasks.
    pub fn from_arcs(
        schedule_service: Arc<ScheduleService<S>>,
        sync_status: watch::Receiver<SyncStatus>,
    ) -> Self {
        Self {
            schedule_service,
            sync_status,
        }
    }
}
