//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`PlannerError`] via `#[from]` or an explicit `From` impl.

use chrono::NaiveDate;

/// Top-level error shared by the domain, the application layer and the
/// port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The schedule references a name the vocabulary does not know.
    #[error("configuration error")]
    Configuration(#[from] ConfigurationError),

    /// An input value broke a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The schedule store failed or returned something unreadable.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A schedule document refers to modes or phases outside the vocabulary.
///
/// The resolvers never substitute a fallback for these: they are surfaced
/// to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("override for {date} uses unknown mode {mode:?}")]
    UnknownOverrideMode { date: NaiveDate, mode: String },

    #[error("phase table defined for unknown mode {mode:?}")]
    UnknownTableMode { mode: String },

    #[error("unknown phase {phase:?} in table {mode:?} at hour {hour}")]
    UnknownPhase {
        mode: String,
        hour: u8,
        phase: String,
    },
}

/// A value that cannot be represented in the domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(u32),

    #[error("invalid hour key {0:?}")]
    InvalidHourKey(String),

    #[error("invalid date key {0:?}, expected YYYY-MM-DD")]
    InvalidDateKey(String),

    #[error("invalid month-day {0:?}, expected MM-DD")]
    InvalidMonthDay(String),

    #[error("phase table must have 24 slots, got {0}")]
    PhaseTableLength(usize),

    #[error("name must not be empty")]
    EmptyName,

    #[error("name {0:?} is listed more than once")]
    DuplicateName(String),

    #[error("{role} {name:?} is not a recognized name")]
    UnrecognizedDefault { role: &'static str, name: String },

    #[error("unknown mode {0:?}")]
    UnknownMode(String),

    #[error("unknown phase {0:?}")]
    UnknownPhase(String),
}
