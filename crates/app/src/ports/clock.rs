//! Clock port: where "now" comes from.

use planner_domain::time::{LocalDateTime, now_local};

/// Source of the current local date and time.
pub trait Clock {
    fn now(&self) -> LocalDateTime;
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LocalDateTime {
        now_local()
    }
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> LocalDateTime {
        (**self).now()
    }
}
