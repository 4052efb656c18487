pub mod calendar;
pub mod clock;
pub mod progress;

pub use calendar::{DAY_MS, YearBounds, days_in_year, is_leap_year};
pub use clock::{Clock, ManualClock, SystemClock};
pub use progress::{PERCENTAGE_TEXT_DECIMALS, ProgressRecord, compute_progress};
