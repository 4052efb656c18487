use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use super::calendar::{DAY_MS, YearBounds, days_in_year};

/// Digits kept by `ProgressRecord::percentage_text`.
pub const PERCENTAGE_TEXT_DECIMALS: usize = 6;

/// Immutable year-progress snapshot for one instant.
///
/// `days_passed` and `days_remaining` are floored independently, so their sum
/// is either `total_days_in_year - 1` or `total_days_in_year` depending on how
/// far into the current day `instant` is. Callers must not force them to add
/// up to a fixed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub instant: DateTime<FixedOffset>,
    pub year: i32,
    pub year_start: DateTime<FixedOffset>,
    pub year_end_exclusive: DateTime<FixedOffset>,
    pub total_days_in_year: u16,
    /// Elapsed share of the year, clamped to `[0, 1]`.
    pub fraction_elapsed: f64,
    /// `fraction_elapsed * 100` at full precision, for animation.
    pub percentage: f64,
    /// `percentage` rendered with six decimals, for display.
    pub percentage_text: String,
    pub days_passed: u32,
    pub days_remaining: u32,
}

impl ProgressRecord {
    /// Percentage rounded to a whole number, half away from zero.
    #[must_use]
    pub fn whole_percentage(&self) -> u32 {
        self.percentage.round().clamp(0.0, 100.0) as u32
    }

    /// Returns `true` when the record was computed inside a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.total_days_in_year == 366
    }
}

/// Computes year progress for `instant`.
///
/// This is a total function: year boundaries are resolved fresh on every call
/// and clock anomalies are absorbed by clamping rather than reported.
#[must_use]
pub fn compute_progress<Tz: TimeZone>(instant: &DateTime<Tz>) -> ProgressRecord {
    let at = instant.fixed_offset();
    let year = at.year();
    let bounds = YearBounds::containing(instant).unwrap_or(YearBounds {
        year,
        start: at,
        end_exclusive: at,
    });

    let span_ms = bounds.span_ms();
    let elapsed_ms = at.signed_duration_since(bounds.start).num_milliseconds();
    let remaining_ms = bounds
        .end_exclusive
        .signed_duration_since(at)
        .num_milliseconds();

    let fraction_elapsed = if span_ms > 0 {
        (elapsed_ms as f64 / span_ms as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let percentage = fraction_elapsed * 100.0;

    ProgressRecord {
        instant: at,
        year: bounds.year,
        year_start: bounds.start,
        year_end_exclusive: bounds.end_exclusive,
        total_days_in_year: days_in_year(bounds.year),
        fraction_elapsed,
        percentage,
        percentage_text: format!("{:.*}", PERCENTAGE_TEXT_DECIMALS, percentage),
        days_passed: whole_days(elapsed_ms),
        days_remaining: whole_days(remaining_ms),
    }
}

fn whole_days(span_ms: i64) -> u32 {
    let days = span_ms.max(0).div_euclid(DAY_MS);
    u32::try_from(days).unwrap_or(u32::MAX)
}
