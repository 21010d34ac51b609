//! JSON handlers for the schedule, the resolver preview and the sync status.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use chrono::Timelike;
use serde::{Deserialize, Serialize};

use planner_app::ports::ScheduleStore;
use planner_app::sync_loop::SyncStatus;
use planner_domain::error::ValidationError;
use planner_domain::holiday::HolidayCalendar;
use planner_domain::resolver::ResolvedState;
use planner_domain::schedule::ScheduleConfig;
use planner_domain::time::{Hour, now_local, parse_date_key};
use planner_domain::vocabulary::Vocabulary;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /api/planner/overrides/{date}`.
///
/// A `null` mode removes the override.
#[derive(Debug, Deserialize)]
pub struct SetOverrideRequest {
    #[serde(default)]
    pub mode: Option<String>,
}

/// Request body for `PUT /api/planner/phases/{mode}/{hour}`.
///
/// A `null` phase unsets the slot.
#[derive(Debug, Deserialize)]
pub struct SetPhaseRequest {
    #[serde(default)]
    pub phase: Option<String>,
}

/// Query of the resolver preview. Missing parts default to the current
/// local date and hour.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    pub date: Option<String>,
    pub hour: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyBody {
    #[serde(flatten)]
    pub vocabulary: Vocabulary,
    pub holidays: HolidayCalendar,
}

/// Possible responses from the schedule endpoints.
pub enum ConfigResponse {
    Ok(Json<ScheduleConfig>),
}

impl IntoResponse for ConfigResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the resolve endpoint.
pub enum ResolveResponse {
    Ok(Json<ResolvedState>),
}

impl IntoResponse for ResolveResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/planner/config`
pub async fn get_config<S>(State(state): State<AppState<S>>) -> Result<ConfigResponse, ApiError>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let config = state.schedule_service.get_config().await?;
    Ok(ConfigResponse::Ok(Json(config)))
}

/// `POST /api/planner/config`
pub async fn replace_config<S>(
    State(state): State<AppState<S>>,
    Json(config): Json<ScheduleConfig>,
) -> Result<ConfigResponse, ApiError>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let config = state.schedule_service.replace_config(config).await?;
    Ok(ConfigResponse::Ok(Json(config)))
}

/// `PUT /api/planner/overrides/{date}`
pub async fn set_override<S>(
    State(state): State<AppState<S>>,
    Path(date): Path<String>,
    Json(req): Json<SetOverrideRequest>,
) -> Result<ConfigResponse, ApiError>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let date = parse_date_key(&date)?;
    let config = state
        .schedule_service
        .set_override(date, req.mode.as_deref())
        .await?;
    Ok(ConfigResponse::Ok(Json(config)))
}

/// `PUT /api/planner/phases/{mode}/{hour}`
pub async fn set_phase<S>(
    State(state): State<AppState<S>>,
    Path((mode, hour)): Path<(String, u32)>,
    Json(req): Json<SetPhaseRequest>,
) -> Result<ConfigResponse, ApiError>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let hour = Hour::new(hour)?;
    let config = state
        .schedule_service
        .set_phase(&mode, hour, req.phase.as_deref())
        .await?;
    Ok(ConfigResponse::Ok(Json(config)))
}

/// `GET /api/planner/resolve?date=YYYY-MM-DD&hour=H`
pub async fn resolve<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<ResolveQuery>,
) -> Result<ResolveResponse, ApiError>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let now = now_local();
    let at = if query.date.is_none() && query.hour.is_none() {
        now
    } else {
        let date = query
            .date
            .as_deref()
            .map(parse_date_key)
            .transpose()?
            .unwrap_or_else(|| now.date());
        let hour = query.hour.unwrap_or_else(|| now.hour());
        let hour = Hour::new(hour)?;
        date.and_hms_opt(u32::from(hour.value()), 0, 0)
            .ok_or(ValidationError::HourOutOfRange(u32::from(hour.value())))?
    };

    let resolved = state.schedule_service.resolve_at(at).await?;
    Ok(ResolveResponse::Ok(Json(resolved)))
}

/// `GET /api/planner/vocabulary`
pub async fn vocabulary<S>(State(state): State<AppState<S>>) -> Json<VocabularyBody>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    Json(VocabularyBody {
        vocabulary: state.schedule_service.vocabulary().clone(),
        holidays: state.schedule_service.holidays().clone(),
    })
}

/// `GET /api/planner/state`
pub async fn sync_state<S>(State(state): State<AppState<S>>) -> Json<SyncStatus>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    Json(state.sync_status.borrow().clone())
}
