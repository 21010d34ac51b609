//! Schedule service: use-cases for reading, editing and previewing the schedule.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use planner_domain::error::{PlannerError, ValidationError};
use planner_domain::holiday::HolidayCalendar;
use planner_domain::resolver::{self, ResolvedState};
use planner_domain::schedule::ScheduleConfig;
use planner_domain::time::{Hour, LocalDateTime};
use planner_domain::vocabulary::Vocabulary;

use crate::ports::ScheduleStore;

/// Application service around the [`ScheduleStore`].
///
/// Edits are read-modify-write cycles on the whole document, serialized by
/// an in-process lock so two concurrent edits cannot lose each other.
pub struct ScheduleService<S> {
    store: S,
    vocabulary: Arc<Vocabulary>,
    holidays: Arc<HolidayCalendar>,
    edits: Mutex<()>,
}

impl<S: ScheduleStore> ScheduleService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S, vocabulary: Arc<Vocabulary>, holidays: Arc<HolidayCalendar>) -> Self {
        Self {
            store,
            vocabulary,
            holidays,
            edits: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Load the stored schedule as-is, without validating it.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn get_config(&self) -> Result<ScheduleConfig, PlannerError> {
        self.store.get().await
    }

    /// Replace the whole schedule after checking it against the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Configuration`] if the document names an
    /// unknown mode or phase, or a storage error from the store.
    pub async fn replace_config(
        &self,
        config: ScheduleConfig,
    ) -> Result<ScheduleConfig, PlannerError> {
        config.validate(&self.vocabulary)?;
        let _guard = self.edits.lock().await;
        self.store.put(config.clone()).await?;
        tracing::info!(
            overrides = config.mode_overrides.len(),
            tables = config.phase_tables.len(),
            "schedule replaced"
        );
        Ok(config)
    }

    /// Force `mode` on `date`, or drop the override when `mode` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMode`] when `mode` is not a regular
    /// mode (the holiday mode cannot be forced), or a storage error.
    pub async fn set_override(
        &self,
        date: NaiveDate,
        mode: Option<&str>,
    ) -> Result<ScheduleConfig, PlannerError> {
        let mode = mode
            .map(|name| {
                self.vocabulary
                    .recognize_override_mode(name)
                    .ok_or_else(|| ValidationError::UnknownMode(name.to_string()))
            })
            .transpose()?;

        self.edit(|config| match &mode {
            Some(mode) => config.set_override(date, mode),
            None => {
                config.mode_overrides.remove(&date);
            }
        })
        .await
    }

    /// Schedule `phase` for `mode` at `hour`, or unset the slot when `phase`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMode`] or
    /// [`ValidationError::UnknownPhase`] for names outside the vocabulary, or
    /// a storage error.
    pub async fn set_phase(
        &self,
        mode: &str,
        hour: Hour,
        phase: Option<&str>,
    ) -> Result<ScheduleConfig, PlannerError> {
        let mode = self
            .vocabulary
            .recognize_mode(mode)
            .ok_or_else(|| ValidationError::UnknownMode(mode.to_string()))?;
        let phase = phase.map(|name| self.vocabulary.phase(name)).transpose()?;

        self.edit(|config| match &phase {
            Some(phase) => config.set_phase(&mode, hour, phase),
            None => config.phase_table_mut(&mode).clear(hour),
        })
        .await
    }

    /// Resolve mode and phase at `at` against the stored schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Configuration`] if the stored schedule names
    /// an unknown mode or phase anywhere, or a storage error.
    pub async fn resolve_at(&self, at: LocalDateTime) -> Result<ResolvedState, PlannerError> {
        let config = self.store.get().await?;
        config.validate(&self.vocabulary)?;
        let state = resolver::resolve(at, &config, &self.holidays, &self.vocabulary)?;
        Ok(state)
    }

    /// Write the stock phase tables when the store holds nothing yet.
    ///
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    pub async fn seed_defaults_if_empty(&self) -> Result<bool, PlannerError> {
        let _guard = self.edits.lock().await;
        if !self.store.get().await?.is_empty() {
            return Ok(false);
        }
        self.store
            .put(ScheduleConfig::with_default_phase_tables(&self.vocabulary))
            .await?;
        tracing::info!("empty schedule seeded with default phase tables");
        Ok(true)
    }

    async fn edit(
        &self,
        apply: impl FnOnce(&mut ScheduleConfig),
    ) -> Result<ScheduleConfig, PlannerError> {
        let _guard = self.edits.lock().await;
        let mut config = self.store.get().await?;
        apply(&mut config);
        self.store.put(config.clone()).await?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;
    use std::sync::Mutex as StdMutex;

    use planner_domain::error::ConfigurationError;

    #[derive(Default)]
    struct InMemoryStore {
        config: StdMutex<ScheduleConfig>,
    }

    impl ScheduleStore for InMemoryStore {
        fn get(&self) -> impl Future<Output = Result<ScheduleConfig, PlannerError>> + Send {
            let config = self.config.lock().unwrap().clone();
            async move { Ok(config) }
        }

        fn put(
            &self,
            config: ScheduleConfig,
        ) -> impl Future<Output = Result<(), PlannerError>> + Send {
            *self.config.lock().unwrap() = config;
            async { Ok(()) }
        }
    }

    fn make_service() -> ScheduleService<Arc<InMemoryStore>> {
        ScheduleService::new(
            Arc::new(InMemoryStore::default()),
            Arc::new(Vocabulary::default()),
            Arc::new(HolidayCalendar::standard()),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn should_return_empty_schedule_when_nothing_stored() {
        let svc = make_service();
        assert!(svc.get_config().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_store_override_and_resolve_it() {
        let svc = make_service();
        svc.set_override(date(2024, 3, 9), Some("Absence"))
            .await
            .unwrap();

        let at = date(2024, 3, 9).and_hms_opt(10, 0, 0).unwrap();
        let state = svc.resolve_at(at).await.unwrap();
        assert_eq!(state.mode.as_str(), "Absence");
        assert_eq!(state.phase.as_str(), "Nuit");
    }

    #[tokio::test]
    async fn should_remove_override_when_mode_is_none() {
        let svc = make_service();
        svc.set_override(date(2024, 3, 9), Some("Absence"))
            .await
            .unwrap();
        let config = svc.set_override(date(2024, 3, 9), None).await.unwrap();
        assert!(config.mode_overrides.is_empty());
    }

    #[tokio::test]
    async fn should_reject_override_with_unknown_mode() {
        let svc = make_service();
        let result = svc.set_override(date(2024, 3, 9), Some("Vacances")).await;
        assert!(matches!(
            result,
            Err(PlannerError::Validation(ValidationError::UnknownMode(_)))
        ));
        assert!(svc.get_config().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_override_with_holiday_mode() {
        let svc = make_service();
        let result = svc.set_override(date(2024, 3, 9), Some("Jour férié")).await;
        assert!(matches!(result, Err(PlannerError::Validation(_))));
    }

    #[tokio::test]
    async fn should_set_and_clear_phase_slot() {
        let svc = make_service();
        let hour = Hour::new(7).unwrap();
        let config = svc.set_phase("Travail", hour, Some("Lever")).await.unwrap();
        assert_eq!(config.phase_table("Travail").unwrap().get(hour), Some("Lever"));

        let config = svc.set_phase("Travail", hour, None).await.unwrap();
        assert_eq!(config.phase_table("Travail").unwrap().get(hour), None);
    }

    #[tokio::test]
    async fn should_reject_unknown_phase() {
        let svc = make_service();
        let result = svc
            .set_phase("Travail", Hour::MIDNIGHT, Some("Sieste"))
            .await;
        assert!(matches!(
            result,
            Err(PlannerError::Validation(ValidationError::UnknownPhase(_)))
        ));
    }

    #[tokio::test]
    async fn should_accept_phase_table_edit_for_holiday_mode() {
        let svc = make_service();
        let result = svc
            .set_phase("Jour férié", Hour::MIDNIGHT, Some("Nuit"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_refuse_to_replace_with_invalid_schedule() {
        let svc = make_service();
        let mut config = ScheduleConfig::default();
        config
            .mode_overrides
            .insert(date(2024, 3, 9), "Vacances".to_string());

        let result = svc.replace_config(config).await;
        assert!(matches!(
            result,
            Err(PlannerError::Configuration(
                ConfigurationError::UnknownOverrideMode { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn should_replace_with_valid_schedule() {
        let svc = make_service();
        let config = ScheduleConfig::with_default_phase_tables(svc.vocabulary());
        svc.replace_config(config.clone()).await.unwrap();
        assert_eq!(svc.get_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn should_seed_defaults_only_once() {
        let svc = make_service();
        assert!(svc.seed_defaults_if_empty().await.unwrap());
        svc.set_phase("Travail", Hour::MIDNIGHT, Some("Retour"))
            .await
            .unwrap();
        assert!(!svc.seed_defaults_if_empty().await.unwrap());

        let config = svc.get_config().await.unwrap();
        assert_eq!(
            config.phase_table("Travail").unwrap().get(Hour::MIDNIGHT),
            Some("Retour")
        );
    }

    #[tokio::test]
    async fn should_not_lose_concurrent_edits() {
        let svc = Arc::new(make_service());
        let mut handles = Vec::new();
        for h in 0..24 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.set_phase("Maison", Hour::new(h).unwrap(), Some("Présence"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let config = svc.get_config().await.unwrap();
        let table = config.phase_table("Maison").unwrap();
        assert!(table.iter().all(|(_, phase)| phase == Some("Présence")));
    }

    #[tokio::test]
    async fn should_surface_configuration_error_when_previewing() {
        let store = Arc::new(InMemoryStore::default());
        store
            .config
            .lock()
            .unwrap()
            .mode_overrides
            .insert(date(2024, 3, 12), "Vacances".to_string());
        let svc = ScheduleService::new(
            Arc::clone(&store),
            Arc::new(Vocabulary::default()),
            Arc::new(HolidayCalendar::standard()),
        );

        let at = date(2024, 3, 12).and_hms_opt(8, 0, 0).unwrap();
        let result = svc.resolve_at(at).await;
        assert!(matches!(result, Err(PlannerError::Configuration(_))));
    }

    #[tokio::test]
    async fn should_refuse_preview_when_stored_table_has_unknown_mode() {
        let store = Arc::new(InMemoryStore::default());
        store.config.lock().unwrap().phase_tables.insert(
            "Vacances".to_string(),
            serde_json::from_str(r#"{"7": "Lever"}"#).unwrap(),
        );
        let svc = ScheduleService::new(
            Arc::clone(&store),
            Arc::new(Vocabulary::default()),
            Arc::new(HolidayCalendar::standard()),
        );

        let at = date(2024, 3, 12).and_hms_opt(7, 0, 0).unwrap();
        let result = svc.resolve_at(at).await;
        assert!(matches!(
            result,
            Err(PlannerError::Configuration(ConfigurationError::UnknownTableMode { .. }))
        ));
    }
}
