//! Host event-loop seam.
//!
//! The scheduler never owns a thread. It asks the host for frame callbacks,
//! fixed-period intervals and one-shot timeouts, and the host calls back into
//! `RefreshScheduler::on_wakeup` when one of them fires.

mod manual;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use manual::ManualEventLoop;

/// Opaque identifier of one armed frame request, interval or timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WakeupKind {
    /// Display-refresh callback (one-shot, re-requested by the scheduler).
    Frame,
    /// Fixed-period repeating timer.
    Interval,
    /// One-shot deferred timer.
    Timeout,
}

/// Notification that the timer behind `handle` fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wakeup {
    pub handle: TimerHandle,
    pub kind: WakeupKind,
}

impl Wakeup {
    #[must_use]
    pub const fn new(handle: TimerHandle, kind: WakeupKind) -> Self {
        Self { handle, kind }
    }
}

/// Cooperative event-loop capability provided by the host UI shell.
///
/// Cancelling an unknown or already-cancelled handle must be a no-op.
pub trait EventLoopHost {
    fn request_frame(&mut self) -> TimerHandle;
    fn cancel_frame(&mut self, handle: TimerHandle);
    fn set_interval(&mut self, period: Duration) -> TimerHandle;
    fn clear_interval(&mut self, handle: TimerHandle);
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;
    fn clear_timeout(&mut self, handle: TimerHandle);
}
