//! Default phase tables used to seed an empty schedule.

use super::{PhaseTable, ScheduleConfig};
use crate::vocabulary::Vocabulary;

/// `(first hour, end hour exclusive, phase)` for the at-work mode.
const AT_WORK: &[(u8, u8, &str)] = &[
    (7, 9, "Lever"),
    (9, 17, "Absence"),
    (18, 22, "Soirée"),
    (22, 23, "Coucher"),
];

/// `(first hour, end hour exclusive, phase)` for the at-home mode.
const AT_HOME: &[(u8, u8, &str)] = &[
    (8, 12, "Présence"),
    (14, 16, "Présence"),
    (20, 22, "Soirée"),
    (22, 23, "Coucher"),
];

impl ScheduleConfig {
    /// A schedule with no overrides and the stock tables: every regular mode
    /// starts filled with the default phase, then the at-work and at-home
    /// modes get their usual day shape. The holiday table copies at-home.
    ///
    /// Stock phase names missing from `vocabulary` are skipped, so the
    /// result always validates.
    #[must_use]
    pub fn with_default_phase_tables(vocabulary: &Vocabulary) -> Self {
        let mut config = Self::default();
        let filler = vocabulary.default_phase();

        let shaped = |ranges: &[(u8, u8, &str)]| {
            let mut table = PhaseTable::filled(&filler);
            for (start, end, name) in ranges {
                if let Some(phase) = vocabulary.recognize_phase(name) {
                    table.set_range(*start..*end, &phase);
                }
            }
            table
        };

        for mode in vocabulary.schedulable_modes() {
            config
                .phase_tables
                .insert(mode.to_string(), PhaseTable::filled(&filler));
        }
        config
            .phase_tables
            .insert(vocabulary.at_work().to_string(), shaped(AT_WORK));
        config
            .phase_tables
            .insert(vocabulary.at_home().to_string(), shaped(AT_HOME));

        let holiday = vocabulary.holiday_mode();
        if holiday != vocabulary.at_work() {
            config
                .phase_tables
                .insert(holiday.to_string(), shaped(AT_HOME));
        }
        config
    }
}
