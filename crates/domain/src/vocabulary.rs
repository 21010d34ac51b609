//! Vocabulary: the recognized mode and phase names.
//!
//! Schedules are edited by people and stored as plain strings. The
//! vocabulary is the single authority deciding which of those strings are
//! meaningful, which modes are the weekday and weekend defaults, which mode
//! is reserved for holidays, and which phase fills unset slots.
//!
//! [`Mode`] and [`Phase`] values can only be obtained through a
//! [`Vocabulary`], so holding one means the name is recognized.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{PlannerError, ValidationError};

/// A recognized household mode (e.g. `Travail`, `Maison`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Mode(String);

impl Mode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Mode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A recognized phase within a mode (e.g. `Lever`, `Soirée`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Phase(String);

impl Phase {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Phase {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed set of names a schedule may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    modes: Vec<String>,
    phases: Vec<String>,
    at_work_mode: String,
    at_home_mode: String,
    holiday_mode: String,
    default_phase: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(ToString::to_string).collect();
        Self {
            modes: owned(&["Travail", "Maison", "Absence"]),
            phases: owned(&[
                "Nuit", "Lever", "Présence", "Absence", "Soirée", "Coucher", "Retour",
            ]),
            at_work_mode: "Travail".to_string(),
            at_home_mode: "Maison".to_string(),
            holiday_mode: "Jour férié".to_string(),
            default_phase: "Nuit".to_string(),
        }
    }
}

impl Vocabulary {
    /// Create a builder for constructing a [`Vocabulary`].
    #[must_use]
    pub fn builder() -> VocabularyBuilder {
        VocabularyBuilder::default()
    }

    /// Check invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Validation`] when:
    /// - any name is empty ([`ValidationError::EmptyName`])
    /// - a mode or phase is listed twice ([`ValidationError::DuplicateName`])
    /// - a weekday default or the default phase is not listed
    ///   ([`ValidationError::UnrecognizedDefault`])
    pub fn validate(&self) -> Result<(), PlannerError> {
        check_names(&self.modes)?;
        check_names(&self.phases)?;
        if self.holiday_mode.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        for (role, name) in [
            ("at-work mode", &self.at_work_mode),
            ("at-home mode", &self.at_home_mode),
        ] {
            if !self.modes.contains(name) {
                return Err(ValidationError::UnrecognizedDefault {
                    role,
                    name: name.clone(),
                }
                .into());
            }
        }
        if !self.phases.contains(&self.default_phase) {
            return Err(ValidationError::UnrecognizedDefault {
                role: "default phase",
                name: self.default_phase.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Regular (user-selectable) modes, in declaration order.
    #[must_use]
    pub fn modes(&self) -> &[String] {
        &self.modes
    }

    /// Recognized phases, in declaration order.
    #[must_use]
    pub fn phases(&self) -> &[String] {
        &self.phases
    }

    /// Every mode that may own a phase table: the regular modes followed by
    /// the holiday mode when it is not one of them.
    pub fn schedulable_modes(&self) -> impl Iterator<Item = Mode> + '_ {
        let holiday = (!self.modes.contains(&self.holiday_mode)).then(|| self.holiday_mode());
        self.modes.iter().cloned().map(Mode).chain(holiday)
    }

    /// Mode used Monday to Friday when nothing else applies.
    #[must_use]
    pub fn at_work(&self) -> Mode {
        Mode(self.at_work_mode.clone())
    }

    /// Mode used on Saturday and Sunday when nothing else applies.
    #[must_use]
    pub fn at_home(&self) -> Mode {
        Mode(self.at_home_mode.clone())
    }

    /// Reserved mode forced on holidays.
    #[must_use]
    pub fn holiday_mode(&self) -> Mode {
        Mode(self.holiday_mode.clone())
    }

    /// Phase reported when a slot is unset.
    #[must_use]
    pub fn default_phase(&self) -> Phase {
        Phase(self.default_phase.clone())
    }

    /// Look up a mode by name. The holiday mode is recognized.
    #[must_use]
    pub fn recognize_mode(&self, name: &str) -> Option<Mode> {
        (name == self.holiday_mode || self.modes.iter().any(|m| m == name))
            .then(|| Mode(name.to_string()))
    }

    /// Look up a mode a user may pick for a date override. The holiday mode
    /// is reserved and therefore refused unless it is also a regular mode.
    #[must_use]
    pub fn recognize_override_mode(&self, name: &str) -> Option<Mode> {
        self.modes
            .iter()
            .any(|m| m == name)
            .then(|| Mode(name.to_string()))
    }

    /// Look up a phase by name.
    #[must_use]
    pub fn recognize_phase(&self, name: &str) -> Option<Phase> {
        self.phases
            .iter()
            .any(|p| p == name)
            .then(|| Phase(name.to_string()))
    }

    /// Like [`recognize_mode`](Self::recognize_mode) but as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownMode`].
    pub fn mode(&self, name: &str) -> Result<Mode, ValidationError> {
        self.recognize_mode(name)
            .ok_or_else(|| ValidationError::UnknownMode(name.to_string()))
    }

    /// Like [`recognize_phase`](Self::recognize_phase) but as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownPhase`].
    pub fn phase(&self, name: &str) -> Result<Phase, ValidationError> {
        self.recognize_phase(name)
            .ok_or_else(|| ValidationError::UnknownPhase(name.to_string()))
    }
}

fn check_names(names: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::DuplicateName(name.clone()));
        }
    }
    Ok(())
}

/// Step-by-step builder for [`Vocabulary`]. Unset fields keep the default
/// vocabulary's values.
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    modes: Option<Vec<String>>,
    phases: Option<Vec<String>>,
    at_work_mode: Option<String>,
    at_home_mode: Option<String>,
    holiday_mode: Option<String>,
    default_phase: Option<String>,
}

impl VocabularyBuilder {
    #[must_use]
    pub fn modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modes = Some(modes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phases = Some(phases.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn at_work_mode(mut self, name: impl Into<String>) -> Self {
        self.at_work_mode = Some(name.into());
        self
    }

    #[must_use]
    pub fn at_home_mode(mut self, name: impl Into<String>) -> Self {
        self.at_home_mode = Some(name.into());
        self
    }

    #[must_use]
    pub fn holiday_mode(mut self, name: impl Into<String>) -> Self {
        self.holiday_mode = Some(name.into());
        self
    }

    #[must_use]
    pub fn default_phase(mut self, name: impl Into<String>) -> Self {
        self.default_phase = Some(name.into());
        self
    }

    /// Consume the builder, validate, and return a [`Vocabulary`].
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Validation`] if the invariants of
    /// [`Vocabulary::validate`] fail.
    pub fn build(self) -> Result<Vocabulary, PlannerError> {
        let base = Vocabulary::default();
        let vocabulary = Vocabulary {
            modes: self.modes.unwrap_or(base.modes),
            phases: self.phases.unwrap_or(base.phases),
            at_work_mode: self.at_work_mode.unwrap_or(base.at_work_mode),
            at_home_mode: self.at_home_mode.unwrap_or(base.at_home_mode),
            holiday_mode: self.holiday_mode.unwrap_or(base.holiday_mode),
            default_phase: self.default_phase.unwrap_or(base.default_phase),
        };
        vocabulary.validate()?;
        Ok(vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_provide_valid_default_vocabulary() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.validate().is_ok());
        assert_eq!(vocabulary.at_work().as_str(), "Travail");
        assert_eq!(vocabulary.at_home().as_str(), "Maison");
        assert_eq!(vocabulary.holiday_mode().as_str(), "Jour férié");
        assert_eq!(vocabulary.default_phase().as_str(), "Nuit");
    }

    #[test]
    fn should_recognize_holiday_mode_for_tables_but_not_for_overrides() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.recognize_mode("Jour férié").is_some());
        assert!(vocabulary.recognize_override_mode("Jour férié").is_none());
        assert!(vocabulary.recognize_override_mode("Absence").is_some());
    }

    #[test]
    fn should_not_recognize_unknown_names() {
        let vocabulary = Vocabulary::default();
        assert!(vocabulary.recognize_mode("Vacances").is_none());
        assert!(vocabulary.recognize_phase("Sieste").is_none());
        assert_eq!(
            vocabulary.mode("Vacances"),
            Err(ValidationError::UnknownMode("Vacances".to_string()))
        );
    }

    #[test]
    fn should_list_holiday_mode_after_regular_modes() {
        let vocabulary = Vocabulary::default();
        let modes: Vec<String> = vocabulary
            .schedulable_modes()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(modes, ["Travail", "Maison", "Absence", "Jour férié"]);
    }

    #[test]
    fn should_not_list_holiday_mode_twice_when_it_is_a_regular_mode() {
        let vocabulary = Vocabulary::builder().holiday_mode("Maison").build().unwrap();
        assert_eq!(vocabulary.schedulable_modes().count(), 3);
    }

    #[test]
    fn should_build_custom_vocabulary() {
        let vocabulary = Vocabulary::builder()
            .modes(["office", "home", "away"])
            .phases(["night", "morning", "day", "evening"])
            .at_work_mode("office")
            .at_home_mode("home")
            .holiday_mode("holiday")
            .default_phase("night")
            .build()
            .unwrap();
        assert_eq!(vocabulary.at_work().as_str(), "office");
        assert_eq!(vocabulary.phases().len(), 4);
    }

    #[test]
    fn should_reject_default_mode_outside_modes() {
        let result = Vocabulary::builder()
            .modes(["office", "home"])
            .at_work_mode("office")
            .at_home_mode("house")
            .build();
        assert!(matches!(
            result,
            Err(PlannerError::Validation(
                ValidationError::UnrecognizedDefault { role: "at-home mode", .. }
            ))
        ));
    }

    #[test]
    fn should_reject_default_phase_outside_phases() {
        let result = Vocabulary::builder().default_phase("Sieste").build();
        assert!(matches!(
            result,
            Err(PlannerError::Validation(
                ValidationError::UnrecognizedDefault { role: "default phase", .. }
            ))
        ));
    }

    #[test]
    fn should_reject_duplicate_phase() {
        let result = Vocabulary::builder().phases(["Nuit", "Nuit"]).build();
        assert!(matches!(
            result,
            Err(PlannerError::Validation(ValidationError::DuplicateName(_)))
        ));
    }

    #[test]
    fn should_reject_empty_mode_name() {
        let result = Vocabulary::builder()
            .modes(["Travail", "Maison", ""])
            .build();
        assert!(matches!(
            result,
            Err(PlannerError::Validation(ValidationError::EmptyName))
        ));
    }
}
