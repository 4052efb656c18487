use tracing::warn;

use crate::core::ProgressRecord;
use crate::error::ProgressResult;

/// Sink for projected progress values, implemented by the presentation layer.
///
/// `live` runs on every continuous tick (bar width, live percentage text).
/// `discrete` runs on every discrete tick after debounce (day counters).
/// Returned errors are logged by the scheduler and never stop it.
pub trait Projection {
    fn live(&mut self, record: &ProgressRecord) -> ProgressResult<()>;

    fn discrete(&mut self, record: &ProgressRecord) -> ProgressResult<()>;
}

/// Projection that drops every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProjection;

impl Projection for NoopProjection {
    fn live(&mut self, _record: &ProgressRecord) -> ProgressResult<()> {
        Ok(())
    }

    fn discrete(&mut self, _record: &ProgressRecord) -> ProgressResult<()> {
        Ok(())
    }
}

/// Adapts two closures into a `Projection`.
pub struct FnProjection<L, D> {
    live: L,
    discrete: D,
}

impl<L, D> FnProjection<L, D>
where
    L: FnMut(&ProgressRecord) -> ProgressResult<()>,
    D: FnMut(&ProgressRecord) -> ProgressResult<()>,
{
    #[must_use]
    pub fn new(live: L, discrete: D) -> Self {
        Self { live, discrete }
    }
}

impl<L, D> Projection for FnProjection<L, D>
where
    L: FnMut(&ProgressRecord) -> ProgressResult<()>,
    D: FnMut(&ProgressRecord) -> ProgressResult<()>,
{
    fn live(&mut self, record: &ProgressRecord) -> ProgressResult<()> {
        (self.live)(record)
    }

    fn discrete(&mut self, record: &ProgressRecord) -> ProgressResult<()> {
        (self.discrete)(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ProjectionKind {
    Live,
    Discrete,
}

/// Invokes one projection and swallows its failure so a broken render
/// cannot kill the cadence that called it.
pub(super) fn dispatch_projection<P: Projection>(
    projection: &mut P,
    kind: ProjectionKind,
    record: &ProgressRecord,
) -> bool {
    let result = match kind {
        ProjectionKind::Live => projection.live(record),
        ProjectionKind::Discrete => projection.discrete(record),
    };

    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(
                error = %err,
                ?kind,
                "projection failed; keeping scheduler running"
            );
            false
        }
    }
}
