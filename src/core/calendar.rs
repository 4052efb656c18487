use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Milliseconds in one nominal calendar day.
pub const DAY_MS: i64 = 86_400_000;

/// Proleptic Gregorian leap-year rule.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Half-open `[start, end_exclusive)` span of one local calendar year.
///
/// Both boundaries are local midnight on January 1st, resolved in the time
/// zone of the instant the bounds were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub year: i32,
    pub start: DateTime<FixedOffset>,
    pub end_exclusive: DateTime<FixedOffset>,
}

impl YearBounds {
    /// Resolves the bounds of the local year containing `instant`.
    ///
    /// Returns `None` only when the following year is outside chrono's
    /// representable range.
    #[must_use]
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Option<Self> {
        let tz = instant.timezone();
        let year = instant.year();
        let start = local_new_year(&tz, year)?;
        let end_exclusive = local_new_year(&tz, year.checked_add(1)?)?;
        Some(Self {
            year,
            start,
            end_exclusive,
        })
    }

    #[must_use]
    pub fn total_days(self) -> u16 {
        days_in_year(self.year)
    }

    #[must_use]
    pub fn span_ms(self) -> i64 {
        (self.end_exclusive - self.start).num_milliseconds()
    }
}

fn local_new_year<Tz: TimeZone>(tz: &Tz, year: i32) -> Option<DateTime<FixedOffset>> {
    let midnight: NaiveDateTime = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let resolved = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Midnight skipped by a DST jump: fall back to the UTC reading.
        LocalResult::None => tz.from_utc_datetime(&midnight),
    };
    Some(resolved.fixed_offset())
}
