use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::core::{Clock, ProgressRecord};
use crate::error::{ProgressError, ProgressResult};
use crate::host::EventLoopHost;
use crate::render::{ExportOptions, ExportScope, RenderCapability};

use super::{ExportConfig, ExportTicket, Projection, RefreshScheduler};

/// Encoded image produced by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub media_type: &'static str,
    /// The record the image was rendered from.
    pub record: ProgressRecord,
}

/// An export that has suspended the scheduler and not yet finished.
///
/// Hand it back to `ExportTrigger::finish` once the host's render completes.
#[derive(Debug)]
#[must_use = "a pending export keeps the scheduler suspended until finished"]
pub struct PendingExport {
    ticket: ExportTicket,
    record: ProgressRecord,
}

impl PendingExport {
    #[must_use]
    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    #[must_use]
    pub fn ticket_id(&self) -> u64 {
        self.ticket.id()
    }
}

/// Captures the displayed progress card as an image.
///
/// The scheduler is suspended for the whole capture so no tick mutates the
/// displayed state mid-render, and it is resumed on every exit path.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTrigger {
    target: String,
    file_stem: String,
    options: ExportOptions,
}

impl Default for ExportTrigger {
    fn default() -> Self {
        Self::from_validated(&ExportConfig::default())
    }
}

impl ExportTrigger {
    /// Builds a trigger from `config`, rejecting invalid export settings up
    /// front rather than at render time.
    pub fn from_config(config: &ExportConfig) -> ProgressResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &ExportConfig) -> Self {
        Self {
            target: config.target.clone(),
            file_stem: config.file_stem.clone(),
            options: config.options(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn options(&self) -> ExportOptions {
        self.options
    }

    /// File name for an export of `record`, e.g. `year-progress-2024.png`.
    #[must_use]
    pub fn file_name(&self, record: &ProgressRecord, media_type: &str) -> String {
        let extension = match media_type {
            "image/jpeg" => "jpg",
            "image/svg+xml" => "svg",
            "image/webp" => "webp",
            _ => "png",
        };
        format!("{}-{}.{extension}", self.file_stem, record.year)
    }

    /// Suspends the scheduler and captures the last displayed record.
    ///
    /// Fails with `NotComputed` before the first computation and with
    /// `ExportBusy` while another export is pending; neither touches the
    /// scheduler.
    pub fn begin<H, C, P>(
        &self,
        scheduler: &mut RefreshScheduler<H, C, P>,
    ) -> ProgressResult<PendingExport>
    where
        H: EventLoopHost,
        C: Clock,
        P: Projection,
    {
        if scheduler.scheduler_state().is_export_in_flight() {
            return Err(ProgressError::ExportBusy);
        }
        let record = scheduler
            .state()
            .read_last()
            .cloned()
            .ok_or(ProgressError::NotComputed)?;
        let ticket = scheduler.suspend_for_export()?;
        debug!(ticket = ticket.id(), target = %self.target, "export started");
        Ok(PendingExport { ticket, record })
    }

    /// Renders a pending export through `renderer`.
    pub fn render<R>(&self, pending: &PendingExport, renderer: &mut R) -> ProgressResult<ExportedImage>
    where
        R: RenderCapability + ?Sized,
    {
        let scope = ExportScope {
            target: &self.target,
            record: &pending.record,
        };
        let bytes = renderer
            .render_to_image(&scope, &self.options)
            .map_err(|err| match err {
                ProgressError::Render(_) => err,
                other => ProgressError::Render(other.to_string()),
            })?;
        let media_type = renderer.media_type();
        Ok(ExportedImage {
            bytes,
            file_name: self.file_name(&pending.record, media_type),
            media_type,
            record: pending.record.clone(),
        })
    }

    /// Releases the scheduler. Returns `true` when the cadences restarted.
    pub fn finish<H, C, P>(
        &self,
        scheduler: &mut RefreshScheduler<H, C, P>,
        pending: PendingExport,
    ) -> bool
    where
        H: EventLoopHost,
        C: Clock,
        P: Projection,
    {
        let ticket_id = pending.ticket.id();
        let resumed = scheduler.resume_after_export(pending.ticket);
        debug!(ticket = ticket_id, resumed, "export finished");
        resumed
    }

    /// Runs a full synchronous export: suspend, render, resume.
    ///
    /// The scheduler is resumed even if `renderer` fails or panics; a panic
    /// is re-raised after the resume.
    pub fn export_with<H, C, P, R>(
        &self,
        scheduler: &mut RefreshScheduler<H, C, P>,
        renderer: &mut R,
    ) -> ProgressResult<ExportedImage>
    where
        H: EventLoopHost,
        C: Clock,
        P: Projection,
        R: RenderCapability + ?Sized,
    {
        let pending = self.begin(scheduler)?;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.render(&pending, renderer)));
        self.finish(scheduler, pending);

        match outcome {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(err)) => {
                warn!(error = %err, target = %self.target, "export failed");
                Err(err)
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}
