//! Change-detecting sync loop.
//!
//! Each tick reads the clock, reloads the schedule, resolves the current
//! mode and phase, and pushes each of them to the notification sink only
//! when it differs from the last value the sink acknowledged. A failed push
//! leaves the last-sent value untouched, so the next tick retries it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;

use planner_domain::error::ConfigurationError;
use planner_domain::holiday::HolidayCalendar;
use planner_domain::resolver::{self, ResolvedState};
use planner_domain::schedule::ScheduleConfig;
use planner_domain::time::LocalDateTime;
use planner_domain::vocabulary::{Mode, Phase, Vocabulary};

use crate::periodic::{Periodic, PeriodicTask};
use crate::ports::{Clock, NotificationSink, NotifyError, ScheduleStore};

/// Where and how resolved values are pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Sink entity receiving the mode.
    pub mode_entity: String,
    /// Sink entity receiving the phase.
    pub phase_entity: String,
    /// Upper bound for a single sink call.
    pub push_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mode_entity: "input_select.planner_mode".to_string(),
            phase_entity: "input_select.planner_phase".to_string(),
            push_timeout: Duration::from_secs(10),
        }
    }
}

/// What happened to one dimension during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PushOutcome {
    /// Same value as the last acknowledged push, nothing sent.
    Unchanged,
    Sent,
    /// The push failed and will be retried on the next tick.
    Failed { error: String },
    /// Nothing resolved, so nothing was attempted.
    Skipped,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub at: LocalDateTime,
    pub resolved: Option<ResolvedState>,
    /// Why the schedule did not resolve or was rejected, when it was.
    pub error: Option<String>,
    /// The store could not be read, or held an invalid schedule, so the
    /// previous one was kept.
    pub stale_config: bool,
    pub mode: PushOutcome,
    pub phase: PushOutcome,
}

impl TickReport {
    /// Number of sink calls made during the tick.
    #[must_use]
    pub fn attempted_pushes(&self) -> usize {
        [&self.mode, &self.phase]
            .into_iter()
            .filter(|outcome| matches!(outcome, PushOutcome::Sent | PushOutcome::Failed { .. }))
            .count()
    }
}

/// Lifecycle of the loop as seen from the outside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    Starting,
    Running,
    /// The loop will not run until the process restarts.
    Disabled { reason: String },
    Stopped,
}

/// Snapshot published after every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    #[serde(flatten)]
    pub state: LoopState,
    /// Heartbeat: when the last tick ran.
    pub last_tick: Option<LocalDateTime>,
    pub last_report: Option<TickReport>,
    pub last_sent_mode: Option<Mode>,
    pub last_sent_phase: Option<Phase>,
}

/// The sync loop and its last-sent bookkeeping.
///
/// One instance is owned by one task: nothing here is shared or locked.
pub struct SyncLoop<S, N, C> {
    store: S,
    sink: N,
    clock: C,
    vocabulary: Arc<Vocabulary>,
    holidays: Arc<HolidayCalendar>,
    settings: SyncSettings,
    last_good: Option<ScheduleConfig>,
    last_sent_mode: Option<Mode>,
    last_sent_phase: Option<Phase>,
    status: watch::Sender<SyncStatus>,
}

impl<S, N, C> SyncLoop<S, N, C>
where
    S: ScheduleStore + Send + Sync + 'static,
    N: NotificationSink + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        store: S,
        sink: N,
        clock: C,
        vocabulary: Arc<Vocabulary>,
        holidays: Arc<HolidayCalendar>,
        settings: SyncSettings,
    ) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            store,
            sink,
            clock,
            vocabulary,
            holidays,
            settings,
            last_good: None,
            last_sent_mode: None,
            last_sent_phase: None,
            status,
        }
    }

    /// Follow the status published by this loop.
    ///
    /// Receivers keep the last published status after the loop is gone.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Run one tick: resolve the current state and push what changed.
    pub async fn tick(&mut self) -> TickReport {
        let at = self.clock.now();
        let refreshed = self.refresh_config().await;
        let stale_config = refreshed.is_err();

        let resolved = if let Err(StaleConfig::Invalid(err)) = refreshed {
            Err(err)
        } else {
            let fallback = ScheduleConfig::default();
            let config = self.last_good.as_ref().unwrap_or(&fallback);
            resolver::resolve(at, config, &self.holidays, &self.vocabulary)
        };

        let report = match resolved {
            Ok(resolved) => {
                let mode = push_if_changed(
                    &self.sink,
                    &self.settings.mode_entity,
                    &resolved.mode,
                    &mut self.last_sent_mode,
                    self.settings.push_timeout,
                )
                .await;
                let phase = push_if_changed(
                    &self.sink,
                    &self.settings.phase_entity,
                    &resolved.phase,
                    &mut self.last_sent_phase,
                    self.settings.push_timeout,
                )
                .await;
                TickReport {
                    at,
                    resolved: Some(resolved),
                    error: None,
                    stale_config,
                    mode,
                    phase,
                }
            }
            Err(err) => {
                tracing::error!(%err, stale_config, "schedule does not resolve, nothing pushed this tick");
                TickReport {
                    at,
                    resolved: None,
                    error: Some(err.to_string()),
                    stale_config,
                    mode: PushOutcome::Skipped,
                    phase: PushOutcome::Skipped,
                }
            }
        };

        self.status.send_modify(|status| {
            status.last_tick = Some(at);
            status.last_sent_mode.clone_from(&self.last_sent_mode);
            status.last_sent_phase.clone_from(&self.last_sent_phase);
            status.last_report = Some(report.clone());
        });
        report
    }

    /// Verify the sink, then spawn the loop every `period`.
    ///
    /// Returns `None` when the credential is missing or rejected: the loop
    /// is then disabled and the reason is published in the status. Any
    /// other verification failure is treated as transient.
    pub async fn start(self, period: Duration) -> Option<PeriodicTask> {
        let timeout = self.settings.push_timeout;
        let verified = tokio::time::timeout(timeout, self.sink.verify())
            .await
            .unwrap_or(Err(NotifyError::TimedOut(timeout)));

        match verified {
            Ok(()) => tracing::info!("notification sink verified"),
            Err(err) if err.is_credential_error() => {
                tracing::error!(%err, reason = "credential", "notification sink refused the credential");
                self.disable(err.to_string());
                return None;
            }
            Err(err) => {
                tracing::warn!(%err, "notification sink unreachable, starting sync loop anyway");
            }
        }

        tracing::info!(period_secs = period.as_secs(), "sync loop started");
        self.status
            .send_modify(|status| status.state = LoopState::Running);
        Some(PeriodicTask::spawn(self, period))
    }

    /// Give up on syncing for the lifetime of the process.
    pub fn disable(self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "sync loop disabled");
        self.status
            .send_modify(|status| status.state = LoopState::Disabled { reason });
    }

    /// Reload the schedule. On error the previous one is kept; a document
    /// naming unknown modes or phases is never adopted.
    async fn refresh_config(&mut self) -> Result<(), StaleConfig> {
        let timeout = self.settings.push_timeout;
        let config = match tokio::time::timeout(timeout, self.store.get()).await {
            Ok(Ok(config)) => config,
            Ok(Err(err)) => {
                tracing::warn!(
                    error = ?err,
                    has_last_good = self.last_good.is_some(),
                    "schedule store unreadable, keeping last good schedule"
                );
                return Err(StaleConfig::Unreadable);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    has_last_good = self.last_good.is_some(),
                    "schedule store did not answer, keeping last good schedule"
                );
                return Err(StaleConfig::Unreadable);
            }
        };

        config
            .validate(&self.vocabulary)
            .map_err(StaleConfig::Invalid)?;
        self.last_good = Some(config);
        Ok(())
    }
}

enum StaleConfig {
    Unreadable,
    Invalid(ConfigurationError),
}

async fn push_if_changed<N, V>(
    sink: &N,
    entity: &str,
    value: &V,
    last_sent: &mut Option<V>,
    timeout: Duration,
) -> PushOutcome
where
    N: NotificationSink + Sync,
    V: AsRef<str> + Clone + PartialEq + Send + Sync,
{
    if last_sent.as_ref() == Some(value) {
        return PushOutcome::Unchanged;
    }

    let result = tokio::time::timeout(timeout, sink.notify(entity, value.as_ref()))
        .await
        .unwrap_or(Err(NotifyError::TimedOut(timeout)));

    match result {
        Ok(()) => {
            tracing::info!(
                entity,
                value = value.as_ref(),
                previous = last_sent.as_ref().map(AsRef::as_ref),
                "value pushed"
            );
            *last_sent = Some(value.clone());
            PushOutcome::Sent
        }
        Err(err) => {
            if err.is_credential_error() {
                tracing::error!(%err, entity, reason = "credential", "push rejected, retrying next tick");
            } else {
                tracing::warn!(%err, entity, "push failed, retrying next tick");
            }
            PushOutcome::Failed {
                error: err.to_string(),
            }
        }
    }
}

impl<S, N, C> Periodic for SyncLoop<S, N, C>
where
    S: ScheduleStore + Send + Sync + 'static,
    N: NotificationSink + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    async fn run_once(&mut self) {
        self.tick().await;
    }

    fn stopped(&mut self) {
        tracing::info!("sync loop stopped");
        self.status
            .send_modify(|status| status.state = LoopState::Stopped);
    }
}
