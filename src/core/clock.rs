use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, TimeDelta, TimeZone};

/// Source of the current wall-clock instant.
pub trait Clock {
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
}

/// Local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Deterministic virtual clock.
///
/// Clones share the same elapsed counter, so a `ManualEventLoop` and the
/// `ProgressState` it drives always observe the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: DateTime<FixedOffset>,
    elapsed_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(origin: DateTime<FixedOffset>) -> Self {
        Self {
            origin,
            elapsed_ms: Rc::new(Cell::new(0)),
        }
    }

    #[must_use]
    pub fn origin(&self) -> DateTime<FixedOffset> {
        self.origin
    }

    /// Milliseconds elapsed since `origin`.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms.get()
    }

    pub fn set_elapsed_ms(&self, elapsed_ms: i64) {
        self.elapsed_ms.set(elapsed_ms);
    }

    pub fn advance(&self, by: Duration) {
        let step = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.elapsed_ms
            .set(self.elapsed_ms.get().saturating_add(step));
    }

    /// Moves the clock to `instant`; instants before `origin` are allowed.
    pub fn set_now(&self, instant: DateTime<FixedOffset>) {
        let elapsed = instant.signed_duration_since(self.origin);
        self.elapsed_ms.set(elapsed.num_milliseconds());
    }
}

impl Clock for ManualClock {
    type Tz = FixedOffset;

    fn now(&self) -> DateTime<FixedOffset> {
        TimeDelta::try_milliseconds(self.elapsed_ms.get())
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock};
    use chrono::{FixedOffset, TimeZone};
    use std::time::Duration;

    #[test]
    fn clones_share_elapsed_time() {
        let origin = FixedOffset::east_opt(0)
            .expect("offset")
            .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
            .single()
            .expect("origin");
        let clock = ManualClock::new(origin);
        let shared = clock.clone();

        shared.advance(Duration::from_millis(1_500));
        assert_eq!(clock.elapsed_ms(), 1_500);
        assert_eq!(
            clock.now().signed_duration_since(origin).num_milliseconds(),
            1_500
        );

        clock.set_now(origin - chrono::TimeDelta::seconds(2));
        assert_eq!(shared.elapsed_ms(), -2_000);
    }
}
