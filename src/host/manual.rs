use std::time::Duration;

use smallvec::SmallVec;
use tracing::trace;

use crate::api::ProgressConfig;
use crate::core::ManualClock;

use super::{EventLoopHost, TimerHandle, Wakeup, WakeupKind};

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    handle: TimerHandle,
    kind: WakeupKind,
    due_ms: i64,
    period_ms: Option<i64>,
}

/// Deterministic virtual-time event loop for headless hosts and tests.
///
/// Time only moves when `pop_due` or `advance_to` is called. Frames fire every
/// `frame_interval`, intervals repeat with their period, timeouts fire once.
/// Ties between timers due at the same millisecond resolve in arming order.
#[derive(Debug)]
pub struct ManualEventLoop {
    clock: ManualClock,
    frame_interval_ms: i64,
    next_handle: u64,
    timers: SmallVec<[ArmedTimer; 4]>,
    fired: u64,
}

impl ManualEventLoop {
    #[must_use]
    pub fn new(clock: ManualClock, frame_interval: Duration) -> Self {
        Self {
            clock,
            frame_interval_ms: duration_ms(frame_interval),
            next_handle: 1,
            timers: SmallVec::new(),
            fired: 0,
        }
    }

    /// Event loop pacing frames by `config.frame_interval_ms`.
    #[must_use]
    pub fn from_config(clock: ManualClock, config: &ProgressConfig) -> Self {
        Self::new(clock, config.frame_interval())
    }

    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.clock.elapsed_ms()
    }

    /// Number of armed timers of every kind.
    #[must_use]
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn armed_count_of(&self, kind: WakeupKind) -> usize {
        self.timers.iter().filter(|timer| timer.kind == kind).count()
    }

    #[must_use]
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.handle == handle)
    }

    /// Total wakeups delivered since construction.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Pops the earliest timer due at or before `deadline_ms`, moving virtual
    /// time forward to its due instant.
    pub fn pop_due(&mut self, deadline_ms: i64) -> Option<Wakeup> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= deadline_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.handle))
            .map(|(index, _)| index)?;

        let timer = self.timers[index];
        if timer.due_ms > self.now_ms() {
            self.clock.set_elapsed_ms(timer.due_ms);
        }

        match timer.period_ms {
            Some(period_ms) => {
                self.timers[index].due_ms = timer.due_ms.saturating_add(period_ms);
            }
            None => {
                self.timers.remove(index);
            }
        }

        self.fired += 1;
        trace!(handle = timer.handle.raw(), kind = ?timer.kind, at_ms = timer.due_ms, "wakeup");
        Some(Wakeup::new(timer.handle, timer.kind))
    }

    /// Moves virtual time forward without delivering anything.
    pub fn advance_to(&mut self, deadline_ms: i64) {
        if deadline_ms > self.now_ms() {
            self.clock.set_elapsed_ms(deadline_ms);
        }
    }

    fn arm(&mut self, kind: WakeupKind, delay_ms: i64, period_ms: Option<i64>) -> TimerHandle {
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle += 1;
        self.timers.push(ArmedTimer {
            handle,
            kind,
            due_ms: self.now_ms().saturating_add(delay_ms),
            period_ms,
        });
        handle
    }

    fn disarm(&mut self, handle: TimerHandle, kind: WakeupKind) {
        let before = self.timers.len();
        self.timers
            .retain(|timer| !(timer.handle == handle && timer.kind == kind));
        if self.timers.len() == before {
            trace!(handle = handle.raw(), ?kind, "cancel of unknown handle ignored");
        }
    }
}

impl EventLoopHost for ManualEventLoop {
    fn request_frame(&mut self) -> TimerHandle {
        self.arm(WakeupKind::Frame, self.frame_interval_ms, None)
    }

    fn cancel_frame(&mut self, handle: TimerHandle) {
        self.disarm(handle, WakeupKind::Frame);
    }

    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let period_ms = duration_ms(period);
        self.arm(WakeupKind::Interval, period_ms, Some(period_ms))
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.disarm(handle, WakeupKind::Interval);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        self.arm(WakeupKind::Timeout, duration_ms(delay), None)
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.disarm(handle, WakeupKind::Timeout);
    }
}

// Zero periods would make `pop_due` spin forever, so every delay is at least 1 ms.
fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis())
        .unwrap_or(i64::MAX)
        .max(1)
}
