use crate::error::AppError;
use std::cell::Cell;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

pub trait Clock {
    /// Current time, truncated to whole seconds.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local offset, or UTC when the offset is unknown.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc().to_offset(local_offset());
        truncate_to_seconds(now)
    }
}

/// Deterministic clock that starts at a fixed instant and moves forward by
/// `step` on every reading.
pub struct SteppingClock {
    next: Cell<OffsetDateTime>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: OffsetDateTime, step: Duration) -> Self {
        Self {
            next: Cell::new(truncate_to_seconds(start)),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn truncate_to_seconds(value: OffsetDateTime) -> OffsetDateTime {
    value.replace_nanosecond(0).unwrap_or(value)
}

/// Renders `yyyy-MM-dd HH:mm:ss`.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, AppError> {
    value
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
