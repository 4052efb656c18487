use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Clock, ProgressRecord};
use crate::error::{ProgressError, ProgressResult};
use crate::host::{EventLoopHost, ManualEventLoop, TimerHandle, Wakeup, WakeupKind};

use super::projection::{ProjectionKind, dispatch_projection};
use super::{DiscreteCadence, ProgressConfig, ProgressState, Projection, RefreshControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SchedulerMode {
    #[default]
    Stopped,
    Running,
}

/// Deferred discrete refresh armed by the last trigger.
///
/// The record is captured when the trigger happens; the deferred firing
/// projects it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDebounce {
    handle: TimerHandle,
    record: ProgressRecord,
}

impl PendingDebounce {
    #[must_use]
    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }
}

/// Single-owner timer bookkeeping of a `RefreshScheduler`.
///
/// `continuous` and `discrete` are present only while `Running`;
/// `pending_debounce` only between a trigger and its firing.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    mode: SchedulerMode,
    continuous: Option<TimerHandle>,
    discrete: Option<TimerHandle>,
    pending_debounce: Option<PendingDebounce>,
    wants_running: bool,
    export_suspension: Option<u64>,
    next_ticket: u64,
}

impl SchedulerState {
    #[must_use]
    pub fn mode(&self) -> SchedulerMode {
        self.mode
    }

    #[must_use]
    pub fn continuous_handle(&self) -> Option<TimerHandle> {
        self.continuous
    }

    #[must_use]
    pub fn discrete_handle(&self) -> Option<TimerHandle> {
        self.discrete
    }

    #[must_use]
    pub fn pending_debounce(&self) -> Option<&PendingDebounce> {
        self.pending_debounce.as_ref()
    }

    /// Whether the last start/stop command asked for the cadences to run.
    #[must_use]
    pub fn wants_running(&self) -> bool {
        self.wants_running
    }

    #[must_use]
    pub fn is_export_in_flight(&self) -> bool {
        self.export_suspension.is_some()
    }

    /// Number of host timers this state currently owns.
    #[must_use]
    pub fn active_handle_count(&self) -> usize {
        usize::from(self.continuous.is_some())
            + usize::from(self.discrete.is_some())
            + usize::from(self.pending_debounce.is_some())
    }
}

/// Proof of an in-flight export suspension, redeemed by
/// `RefreshScheduler::resume_after_export`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an export ticket must be handed back to resume the scheduler"]
pub struct ExportTicket {
    id: u64,
}

impl ExportTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Cadence timing derived from `ProgressConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerTiming {
    pub discrete_interval: Duration,
    pub discrete_cadence: DiscreteCadence,
}

impl SchedulerTiming {
    #[must_use]
    pub fn from_config(config: &ProgressConfig) -> Self {
        Self {
            discrete_interval: config.discrete_interval(),
            discrete_cadence: config.discrete_cadence,
        }
    }
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self::from_config(&ProgressConfig::default())
    }
}

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub live_projections: u64,
    pub discrete_projections: u64,
    pub projection_failures: u64,
    pub stale_wakeups: u64,
}

impl SchedulerStats {
    fn note(&mut self, kind: ProjectionKind, succeeded: bool) {
        match kind {
            ProjectionKind::Live => self.live_projections += 1,
            ProjectionKind::Discrete => self.discrete_projections += 1,
        }
        if !succeeded {
            self.projection_failures += 1;
        }
    }
}

/// Drives the continuous and discrete cadences on a cooperative host loop.
///
/// All mutation happens on the host's single execution context: the host
/// calls `on_wakeup`, visibility changes call `start`/`stop`, exports call
/// `suspend_for_export`/`resume_after_export`. Nothing here blocks.
pub struct RefreshScheduler<H: EventLoopHost, C: Clock, P: Projection> {
    host: H,
    state: ProgressState<C>,
    projection: P,
    timing: SchedulerTiming,
    sched: SchedulerState,
    stats: SchedulerStats,
}

impl<H: EventLoopHost, C: Clock, P: Projection> RefreshScheduler<H, C, P> {
    #[must_use]
    pub fn new(host: H, clock: C, projection: P, timing: SchedulerTiming) -> Self {
        Self {
            host,
            state: ProgressState::new(clock),
            projection,
            timing,
            sched: SchedulerState::default(),
            stats: SchedulerStats::default(),
        }
    }

    /// Builds a scheduler from a validated config.
    pub fn from_config(
        host: H,
        clock: C,
        projection: P,
        config: &ProgressConfig,
    ) -> ProgressResult<Self> {
        config.validate()?;
        Ok(Self::new(
            host,
            clock,
            projection,
            SchedulerTiming::from_config(config),
        ))
    }

    /// Arms both cadences after one immediate recompute and projection.
    ///
    /// Idempotent. While an export is in flight the request is remembered and
    /// honored when the export finishes.
    pub fn start(&mut self) {
        self.sched.wants_running = true;
        if let Some(ticket) = self.sched.export_suspension {
            debug!(ticket, "start deferred until export completes");
            return;
        }
        if self.sched.mode == SchedulerMode::Running {
            trace!("start ignored: scheduler already running");
            return;
        }
        self.arm();
    }

    /// Cancels every cadence and any pending debounce. Idempotent.
    pub fn stop(&mut self) {
        self.sched.wants_running = false;
        self.disarm("stop");
    }

    /// Page unload: stops everything and forgets any in-flight export.
    pub fn teardown(&mut self) {
        if let Some(ticket) = self.sched.export_suspension.take() {
            debug!(ticket, "dropping export suspension on teardown");
        }
        self.stop();
        debug!("refresh scheduler torn down");
    }

    /// Dispatches a host wakeup. Wakeups for handles that are no longer
    /// current are ignored.
    pub fn on_wakeup(&mut self, wakeup: Wakeup) {
        match wakeup.kind {
            WakeupKind::Frame if self.sched.continuous == Some(wakeup.handle) => {
                self.tick_continuous();
            }
            WakeupKind::Interval if self.sched.discrete == Some(wakeup.handle) => {
                self.tick_discrete();
            }
            WakeupKind::Timeout
                if self
                    .sched
                    .pending_debounce
                    .as_ref()
                    .is_some_and(|pending| pending.handle == wakeup.handle) =>
            {
                self.fire_debounce();
            }
            _ => {
                self.stats.stale_wakeups += 1;
                trace!(
                    handle = wakeup.handle.raw(),
                    kind = ?wakeup.kind,
                    "ignoring stale wakeup"
                );
            }
        }
    }

    /// Requests a discrete refresh outside the interval rhythm.
    ///
    /// In debounced mode the record is computed now and any pending deferred
    /// refresh is replaced, so a burst of triggers yields one projection of
    /// the record from the last trigger. Returns `false` while stopped.
    pub fn trigger_discrete_refresh(&mut self) -> bool {
        if self.sched.mode != SchedulerMode::Running {
            trace!("discrete trigger ignored while stopped");
            return false;
        }

        let Some(window) = self.timing.discrete_cadence.debounce_window() else {
            let record = self.state.recompute_now();
            let ok = dispatch_projection(&mut self.projection, ProjectionKind::Discrete, record);
            self.stats.note(ProjectionKind::Discrete, ok);
            return true;
        };

        let record = self.state.recompute_now().clone();
        if let Some(previous) = self.sched.pending_debounce.take() {
            self.host.clear_timeout(previous.handle);
            trace!(
                replaced = previous.handle.raw(),
                "debounced refresh rearmed"
            );
        }
        let handle = self.host.set_timeout(window);
        self.sched.pending_debounce = Some(PendingDebounce { handle, record });
        true
    }

    /// Stops all cadences for the duration of an export.
    ///
    /// Fails with `ExportBusy` if another export already holds the scheduler.
    pub fn suspend_for_export(&mut self) -> ProgressResult<ExportTicket> {
        if let Some(ticket) = self.sched.export_suspension {
            debug!(ticket, "export rejected: another export is in flight");
            return Err(ProgressError::ExportBusy);
        }

        self.sched.next_ticket += 1;
        let id = self.sched.next_ticket;
        self.sched.export_suspension = Some(id);
        self.disarm("export");
        debug!(
            ticket = id,
            resume_when_done = self.sched.wants_running,
            "suspended for export"
        );
        Ok(ExportTicket { id })
    }

    /// Ends an export suspension and restarts the cadences if the last
    /// visibility command asked for them. Returns `true` when restarted.
    pub fn resume_after_export(&mut self, ticket: ExportTicket) -> bool {
        if self.sched.export_suspension != Some(ticket.id) {
            warn!(ticket = ticket.id, "ignoring stale export ticket");
            return false;
        }
        self.sched.export_suspension = None;

        if !self.sched.wants_running {
            debug!(ticket = ticket.id, "export finished while hidden; staying stopped");
            return false;
        }
        debug!(ticket = ticket.id, "resuming after export");
        self.arm();
        true
    }

    #[must_use]
    pub fn mode(&self) -> SchedulerMode {
        self.sched.mode
    }

    #[must_use]
    pub fn scheduler_state(&self) -> &SchedulerState {
        &self.sched
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState<C> {
        &self.state
    }

    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    #[must_use]
    pub fn timing(&self) -> SchedulerTiming {
        self.timing
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn projection(&self) -> &P {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut P {
        &mut self.projection
    }

    fn arm(&mut self) {
        self.sched.mode = SchedulerMode::Running;

        let record = self.state.recompute_now();
        let live_ok = dispatch_projection(&mut self.projection, ProjectionKind::Live, record);
        self.stats.note(ProjectionKind::Live, live_ok);
        let discrete_ok =
            dispatch_projection(&mut self.projection, ProjectionKind::Discrete, record);
        self.stats.note(ProjectionKind::Discrete, discrete_ok);

        self.sched.continuous = Some(self.host.request_frame());
        self.sched.discrete = Some(self.host.set_interval(self.timing.discrete_interval));
        debug!(
            generation = self.state.generation(),
            interval_ms = self.timing.discrete_interval.as_millis() as u64,
            "refresh scheduler started"
        );
    }

    // Handles are taken out of the state before the host cancels them, so a
    // cancelled handle can neither be cancelled twice nor match a late wakeup.
    fn disarm(&mut self, reason: &'static str) {
        if self.sched.mode == SchedulerMode::Stopped && self.sched.active_handle_count() == 0 {
            trace!(reason, "disarm ignored: scheduler already stopped");
            return;
        }

        if let Some(handle) = self.sched.continuous.take() {
            self.host.cancel_frame(handle);
        }
        if let Some(handle) = self.sched.discrete.take() {
            self.host.clear_interval(handle);
        }
        if let Some(pending) = self.sched.pending_debounce.take() {
            self.host.clear_timeout(pending.handle);
        }
        self.sched.mode = SchedulerMode::Stopped;
        debug!(reason, "refresh scheduler stopped");
    }

    fn tick_continuous(&mut self) {
        self.sched.continuous = None;

        let record = self.state.recompute_now();
        let ok = dispatch_projection(&mut self.projection, ProjectionKind::Live, record);
        self.stats.note(ProjectionKind::Live, ok);

        if self.sched.mode == SchedulerMode::Running {
            self.sched.continuous = Some(self.host.request_frame());
        }
    }

    fn tick_discrete(&mut self) {
        trace!("discrete interval tick");
        self.trigger_discrete_refresh();
    }

    fn fire_debounce(&mut self) {
        if let Some(pending) = self.sched.pending_debounce.take() {
            let ok = dispatch_projection(
                &mut self.projection,
                ProjectionKind::Discrete,
                &pending.record,
            );
            self.stats.note(ProjectionKind::Discrete, ok);
        }
    }
}

impl<H: EventLoopHost, C: Clock, P: Projection> RefreshControl for RefreshScheduler<H, C, P> {
    fn start(&mut self) {
        RefreshScheduler::start(self);
    }

    fn stop(&mut self) {
        RefreshScheduler::stop(self);
    }

    fn teardown(&mut self) {
        RefreshScheduler::teardown(self);
    }
}

impl<C: Clock, P: Projection> RefreshScheduler<ManualEventLoop, C, P> {
    /// Advances virtual time by `span`, delivering every wakeup that falls
    /// due on the way. Returns the number of wakeups delivered.
    pub fn run_for(&mut self, span: Duration) -> usize {
        let span_ms = i64::try_from(span.as_millis()).unwrap_or(i64::MAX);
        let deadline = self.host.now_ms().saturating_add(span_ms);

        let mut delivered = 0;
        while let Some(wakeup) = self.host.pop_due(deadline) {
            self.on_wakeup(wakeup);
            delivered += 1;
        }
        self.host.advance_to(deadline);
        delivered
    }
}
