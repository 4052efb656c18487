use std::time::Duration;

use chrono::{FixedOffset, TimeZone};
use year_progress::ProgressError;
use year_progress::api::{
    NoopProjection, ProgressConfig, RefreshControl, RefreshScheduler, SchedulerMode, Visibility,
    VisibilityGate,
};
use year_progress::core::ManualClock;
use year_progress::host::ManualEventLoop;

#[derive(Debug, Default)]
struct CountingControl {
    starts: usize,
    stops: usize,
    teardowns: usize,
}

impl RefreshControl for CountingControl {
    fn start(&mut self) {
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn teardown(&mut self) {
        self.teardowns += 1;
    }
}

fn scheduler() -> RefreshScheduler<ManualEventLoop, ManualClock, NoopProjection> {
    let origin = FixedOffset::east_opt(0)
        .expect("offset")
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("origin");
    let clock = ManualClock::new(origin);
    let config = ProgressConfig::default();
    let host = ManualEventLoop::new(clock.clone(), config.frame_interval());
    RefreshScheduler::from_config(host, clock, NoopProjection, &config).expect("scheduler init")
}

#[test]
fn gate_forwards_every_transition_including_duplicates() {
    let gate = VisibilityGate::new();
    let mut control = CountingControl::default();

    gate.on_transition(&mut control, Visibility::Visible);
    gate.on_transition(&mut control, Visibility::Visible);
    gate.on_transition(&mut control, Visibility::Hidden);
    gate.on_unload(&mut control);

    assert_eq!(control.starts, 2);
    assert_eq!(control.stops, 1);
    assert_eq!(control.teardowns, 1);
}

#[test]
fn duplicate_visible_does_not_double_arm() {
    let gate = VisibilityGate::new();
    let mut scheduler = scheduler();

    gate.on_transition(&mut scheduler, Visibility::Visible);
    gate.on_transition(&mut scheduler, Visibility::Visible);

    assert_eq!(scheduler.mode(), SchedulerMode::Running);
    assert_eq!(scheduler.state().generation(), 1);
    assert_eq!(scheduler.host().armed_count(), 2);
}

#[test]
fn hidden_page_holds_no_timers_and_never_ticks() {
    let gate = VisibilityGate::new();
    let mut scheduler = scheduler();
    gate.on_transition(&mut scheduler, Visibility::Visible);
    scheduler.run_for(Duration::from_millis(50));

    gate.on_transition(&mut scheduler, Visibility::Hidden);
    let generation = scheduler.state().generation();
    let fired = scheduler.host().fired_count();
    scheduler.run_for(Duration::from_secs(30));

    assert_eq!(scheduler.mode(), SchedulerMode::Stopped);
    assert_eq!(scheduler.host().armed_count(), 0);
    assert_eq!(scheduler.state().generation(), generation);
    assert_eq!(scheduler.host().fired_count(), fired);
}

#[test]
fn becoming_visible_again_recomputes_immediately() {
    let gate = VisibilityGate::new();
    let mut scheduler = scheduler();
    gate.on_transition(&mut scheduler, Visibility::Visible);
    gate.on_transition(&mut scheduler, Visibility::Hidden);
    let hidden_record = scheduler.state().read_last().cloned().expect("record");

    scheduler.host().clock().advance(Duration::from_secs(3_600));
    gate.on_transition(&mut scheduler, Visibility::Visible);

    let fresh = scheduler.state().read_last().expect("record");
    assert!(fresh.instant > hidden_record.instant);
    assert_eq!(scheduler.host().armed_count(), 2);
}

#[test]
fn unload_tears_the_scheduler_down() {
    let gate = VisibilityGate::new();
    let mut scheduler = scheduler();
    gate.on_transition(&mut scheduler, Visibility::Visible);

    gate.on_unload(&mut scheduler);

    assert_eq!(scheduler.mode(), SchedulerMode::Stopped);
    assert_eq!(scheduler.host().armed_count(), 0);
    assert!(!scheduler.scheduler_state().wants_running());
}

#[test]
fn gate_accepts_dynamic_refresh_control() {
    let gate = VisibilityGate::new();
    let mut control = CountingControl::default();
    let dynamic: &mut dyn RefreshControl = &mut control;

    gate.on_transition(dynamic, Visibility::Hidden);

    assert_eq!(control.stops, 1);
}

#[test]
fn visibility_parses_host_state_strings() {
    assert_eq!("visible".parse::<Visibility>().ok(), Some(Visibility::Visible));
    assert_eq!(" Hidden ".parse::<Visibility>().ok(), Some(Visibility::Hidden));
    assert_eq!("prerender".parse::<Visibility>().ok(), Some(Visibility::Hidden));
    assert_eq!("unloaded".parse::<Visibility>().ok(), Some(Visibility::Hidden));
    assert!(matches!(
        "minimised".parse::<Visibility>(),
        Err(ProgressError::InvalidData(_))
    ));
    assert_eq!(Visibility::Visible.to_string(), "visible");
}
