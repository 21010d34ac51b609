//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use planner_app::ports::ScheduleStore;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level.
pub fn build<S>(state: AppState<S>) -> Router
where
    S: ScheduleStore + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::watch;
    use tower::ServiceExt;

    use planner_app::services::ScheduleService;
    use planner_domain::error::PlannerError;
    use planner_domain::holiday::HolidayCalendar;
    use planner_domain::schedule::ScheduleConfig;
    use planner_domain::vocabulary::Vocabulary;

    struct StubStore;

    impl ScheduleStore for StubStore {
        fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send {
            async { Ok(ScheduleConfig::default()) }
        }

        fn put(
            &self,
            _config: ScheduleConfig,
        ) -> impl Future<Output = Result<(), PlannerError>> + Send {
            async { Ok(()) }
        }
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let service = ScheduleService::new(
            StubStore,
            Arc::new(Vocabulary::default()),
            Arc::new(HolidayCalendar::standard()),
        );
        let (_, status) = watch::channel(Default::default());
        let app = build(AppState::new(service, status));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
