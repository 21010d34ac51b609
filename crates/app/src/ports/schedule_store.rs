//! Schedule store port: persistence of the schedule document.

use std::future::Future;

use planner_domain::error::PlannerError;
use planner_domain::schedule::ScheduleConfig;

/// Reads and replaces the whole schedule document.
///
/// A store that has never been written returns an empty
/// [`ScheduleConfig`], not an error.
pub trait ScheduleStore {
    /// Load the current schedule.
    fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send;

    /// Replace the stored schedule with `config`.
    ///
    /// Either the whole document is written or nothing is: a failed `put`
    /// leaves the previous schedule readable.
    fn put(&self, config: ScheduleConfig) -> impl Future<Output = Result<(), PlannerError>> + Send;
}

impl<T: ScheduleStore + Send + Sync> ScheduleStore for std::sync::Arc<T> {
    fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send {
        (**self).get()
    }

    fn put(&self, config: ScheduleConfig) -> impl Future<Output = Result<(), PlannerError>> + Send {
        (**self).put(config)
    }
}
