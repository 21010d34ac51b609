//! Schedule: the user-edited declarative document.
//!
//! A schedule holds per-date mode overrides and, for each mode, a
//! [`PhaseTable`] of 24 hourly slots. The serialized form uses `modes` for
//! overrides and `phases` for the tables.

mod defaults;
mod phase_table;

pub use phase_table::PhaseTable;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::time::Hour;
use crate::vocabulary::{Mode, Phase, Vocabulary};

/// The full declarative schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Date key → mode name.
    #[serde(rename = "modes", default)]
    pub mode_overrides: BTreeMap<NaiveDate, String>,
    /// Mode name → hourly phase table.
    #[serde(rename = "phases", default)]
    pub phase_tables: BTreeMap<String, PhaseTable>,
}

impl ScheduleConfig {
    /// Whether the document holds neither overrides nor tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode_overrides.is_empty() && self.phase_tables.is_empty()
    }

    /// The raw override stored for `date`, if any.
    #[must_use]
    pub fn override_for(&self, date: NaiveDate) -> Option<&str> {
        self.mode_overrides.get(&date).map(String::as_str)
    }

    /// Force `mode` on `date`, replacing any previous override.
    pub fn set_override(&mut self, date: NaiveDate, mode: &Mode) {
        self.mode_overrides.insert(date, mode.to_string());
    }

    #[must_use]
    pub fn phase_table(&self, mode: &str) -> Option<&PhaseTable> {
        self.phase_tables.get(mode)
    }

    /// The table of `mode`, created all-unset on first access.
    pub fn phase_table_mut(&mut self, mode: &Mode) -> &mut PhaseTable {
        self.phase_tables.entry(mode.to_string()).or_default()
    }

    /// Schedule `phase` for `mode` at `hour`.
    pub fn set_phase(&mut self, mode: &Mode, hour: Hour, phase: &Phase) {
        self.phase_table_mut(mode).set(hour, phase);
    }

    /// Check every name in the document against `vocabulary`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found, scanning overrides in
    /// date order and then tables in mode order.
    pub fn validate(&self, vocabulary: &Vocabulary) -> Result<(), ConfigurationError> {
        for (date, mode) in &self.mode_overrides {
            if vocabulary.recognize_override_mode(mode).is_none() {
                return Err(ConfigurationError::UnknownOverrideMode {
                    date: *date,
                    mode: mode.clone(),
                });
            }
        }
        for (mode, table) in &self.phase_tables {
            if vocabulary.recognize_mode(mode).is_none() {
                return Err(ConfigurationError::UnknownTableMode { mode: mode.clone() });
            }
            for (hour, slot) in table.iter() {
                if let Some(phase) = slot {
                    if vocabulary.recognize_phase(phase).is_none() {
                        return Err(ConfigurationError::UnknownPhase {
                            mode: mode.clone(),
                            hour: hour.value(),
                            phase: phase.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_be_empty_by_default() {
        let config = ScheduleConfig::default();
        assert!(config.is_empty());
        assert!(config.phase_table("Travail").is_none());
    }

    #[test]
    fn should_create_full_size_table_on_first_mutable_access() {
        let vocabulary = Vocabulary::default();
        let mut config = ScheduleConfig::default();
        let table = config.phase_table_mut(&vocabulary.at_work());
        assert!(table.is_unset());
        assert_eq!(table.iter().count(), 24);
        assert!(config.phase_table("Travail").is_some());
    }

    #[test]
    fn should_overwrite_override_for_same_date() {
        let vocabulary = Vocabulary::default();
        let mut config = ScheduleConfig::default();
        let day = date(2024, 3, 9);
        config.set_override(day, &vocabulary.at_work());
        config.set_override(day, &vocabulary.mode("Absence").unwrap());
        assert_eq!(config.override_for(day), Some("Absence"));
        assert_eq!(config.mode_overrides.len(), 1);
    }

    #[test]
    fn should_set_phase_in_lazily_created_table() {
        let vocabulary = Vocabulary::default();
        let mut config = ScheduleConfig::default();
        let hour = Hour::new(7).unwrap();
        config.set_phase(
            &vocabulary.at_home(),
            hour,
            &vocabulary.phase("Lever").unwrap(),
        );
        assert_eq!(config.phase_table("Maison").unwrap().get(hour), Some("Lever"));
    }

    #[test]
    fn should_parse_document_with_sparse_tables() {
        let json = r#"{
            "modes": { "2024-03-09": "Absence" },
            "phases": { "Travail": { "7": "Lever", "8": "Lever" } }
        }"#;
        let config: ScheduleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.override_for(date(2024, 3, 9)), Some("Absence"));
        assert_eq!(
            config
                .phase_table("Travail")
                .unwrap()
                .get(Hour::new(8).unwrap()),
            Some("Lever")
        );
    }

    #[test]
    fn should_parse_empty_object_as_empty_schedule() {
        let config: ScheduleConfig = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn should_reject_malformed_date_key() {
        let result: Result<ScheduleConfig, _> =
            serde_json::from_str(r#"{ "modes": { "09/03/2024": "Absence" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_validate_known_names() {
        let vocabulary = Vocabulary::default();
        let config = ScheduleConfig::with_default_phase_tables(&vocabulary);
        assert!(config.validate(&vocabulary).is_ok());
    }

    #[test]
    fn should_reject_override_with_unknown_mode() {
        let mut config = ScheduleConfig::default();
        config
            .mode_overrides
            .insert(date(2024, 3, 9), "Vacances".to_string());
        assert_eq!(
            config.validate(&Vocabulary::default()),
            Err(ConfigurationError::UnknownOverrideMode {
                date: date(2024, 3, 9),
                mode: "Vacances".to_string(),
            })
        );
    }

    #[test]
    fn should_reject_override_with_reserved_holiday_mode() {
        let mut config = ScheduleConfig::default();
        config
            .mode_overrides
            .insert(date(2024, 3, 9), "Jour férié".to_string());
        assert!(matches!(
            config.validate(&Vocabulary::default()),
            Err(ConfigurationError::UnknownOverrideMode { .. })
        ));
    }

    #[test]
    fn should_reject_table_for_unknown_mode() {
        let mut config = ScheduleConfig::default();
        config
            .phase_tables
            .insert("Vacances".to_string(), PhaseTable::default());
        assert!(matches!(
            config.validate(&Vocabulary::default()),
            Err(ConfigurationError::UnknownTableMode { .. })
        ));
    }

    #[test]
    fn should_reject_unknown_phase_in_table() {
        let config: ScheduleConfig =
            serde_json::from_str(r#"{ "phases": { "Maison": { "13": "Sieste" } } }"#).unwrap();
        assert_eq!(
            config.validate(&Vocabulary::default()),
            Err(ConfigurationError::UnknownPhase {
                mode: "Maison".to_string(),
                hour: 13,
                phase: "Sieste".to_string(),
            })
        );
    }

    #[test]
    fn should_accept_table_for_holiday_mode() {
        let vocabulary = Vocabulary::default();
        let mut config = ScheduleConfig::default();
        config.phase_table_mut(&vocabulary.holiday_mode());
        assert!(config.validate(&vocabulary).is_ok());
    }
}
