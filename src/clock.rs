//! Injectable source of "today" for validation and age labels.
//!
//! The process never consults the host time zone. `SystemClock` reads the
//! calendar date at a configured UTC offset (`UTC_OFFSET`, default UTC), so
//! "today" matches the users' local calendar only when that offset does.

use time::{Date, OffsetDateTime, UtcOffset};

pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Wall clock at a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> Date {
        local_date(OffsetDateTime::now_utc(), self.offset)
    }
}

/// Calendar date of `now` as seen at `offset`.
pub(crate) fn local_date(now: OffsetDateTime, offset: UtcOffset) -> Date {
    now.to_offset(offset).date()
}

/// Clock pinned to a single date.
#[cfg(test)]
pub struct FixedClock(pub Date);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
#[path = "clock_test.rs"]
mod tests;
