//! Mode and phase resolution.
//!
//! Both resolvers are pure: the instant is passed in, nothing reads a clock
//! and nothing performs IO. The same inputs always give the same answer.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::holiday::HolidayCalendar;
use crate::schedule::ScheduleConfig;
use crate::time::{Hour, LocalDateTime};
use crate::vocabulary::{Mode, Phase, Vocabulary};

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedState {
    pub mode: Mode,
    pub phase: Phase,
    /// Local instant the resolution was computed for.
    pub as_of: LocalDateTime,
}

/// Effective mode for `date`. First match wins:
///
/// 1. the date's month-day is a holiday → the holiday mode
/// 2. the schedule overrides the date → that mode
/// 3. Saturday or Sunday → at-home, any other day → at-work
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownOverrideMode`] when the override for
/// `date` is not a recognized mode. No substitute is guessed.
pub fn resolve_mode(
    date: NaiveDate,
    config: &ScheduleConfig,
    holidays: &HolidayCalendar,
    vocabulary: &Vocabulary,
) -> Result<Mode, ConfigurationError> {
    if holidays.contains(date) {
        return Ok(vocabulary.holiday_mode());
    }

    if let Some(name) = config.override_for(date) {
        return vocabulary.recognize_override_mode(name).ok_or_else(|| {
            ConfigurationError::UnknownOverrideMode {
                date,
                mode: name.to_string(),
            }
        });
    }

    Ok(match date.weekday() {
        Weekday::Sat | Weekday::Sun => vocabulary.at_home(),
        _ => vocabulary.at_work(),
    })
}

/// Scheduled phase for `mode` at `hour`.
///
/// A mode without a table, or an unset slot, yields the vocabulary's
/// default phase.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownPhase`] when the slot holds a name
/// the vocabulary does not recognize.
pub fn resolve_phase(
    mode: &Mode,
    hour: Hour,
    config: &ScheduleConfig,
    vocabulary: &Vocabulary,
) -> Result<Phase, ConfigurationError> {
    let Some(name) = config
        .phase_table(mode.as_str())
        .and_then(|table| table.get(hour))
    else {
        return Ok(vocabulary.default_phase());
    };

    vocabulary
        .recognize_phase(name)
        .ok_or_else(|| ConfigurationError::UnknownPhase {
            mode: mode.to_string(),
            hour: hour.value(),
            phase: name.to_string(),
        })
}

/// Resolve both mode and phase for a local instant.
///
/// # Errors
///
/// Propagates the [`ConfigurationError`] of either resolver.
pub fn resolve(
    at: LocalDateTime,
    config: &ScheduleConfig,
    holidays: &HolidayCalendar,
    vocabulary: &Vocabulary,
) -> Result<ResolvedState, ConfigurationError> {
    let mode = resolve_mode(at.date(), config, holidays, vocabulary)?;
    let phase = resolve_phase(&mode, Hour::of(&at), config, vocabulary)?;
    Ok(ResolvedState {
        mode,
        phase,
        as_of: at,
    })
}
