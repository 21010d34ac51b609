//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod planner;

use axum::Router;
use axum::routing::{get, put};

use planner_app::ports::ScheduleStore;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/planner/config",
            get(planner::get_config::<S>).post(planner::replace_config::<S>),
        )
        .route(
            "/planner/overrides/{date}",
            put(planner::set_override::<S>),
        )
        .route(
            "/planner/phases/{mode}/{hour}",
            put(planner::set_phase::<S>),
        )
        .route("/planner/resolve", get(planner::resolve::<S>))
        .route("/planner/vocabulary", get(planner::vocabulary::<S>))
        .route("/planner/state", get(planner::sync_state::<S>))
}
