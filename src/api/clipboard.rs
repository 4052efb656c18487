use tracing::{debug, warn};

use crate::core::{Clock, ProgressRecord};
use crate::error::{ProgressError, ProgressResult};

use super::ClipboardConfig;
use super::ProgressState;
use super::validation::validate_clipboard_config;

/// Host clipboard capability.
pub trait ClipboardCapability {
    fn write_text(&mut self, text: &str) -> ProgressResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The text that was handed to the clipboard.
    Copied(String),
    /// Nothing was copied because no record has been computed yet.
    Skipped,
}

/// Renders the last computed record as a block-glyph bar for sharing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipboardFormatter {
    config: ClipboardConfig,
}

impl ClipboardFormatter {
    pub fn new(config: ClipboardConfig) -> ProgressResult<Self> {
        Ok(Self {
            config: validate_clipboard_config(config)?,
        })
    }

    #[must_use]
    pub fn config(&self) -> ClipboardConfig {
        self.config
    }

    /// Number of filled glyphs for `percentage`.
    #[must_use]
    pub fn filled_blocks(&self, percentage: f64) -> usize {
        let total = usize::from(self.config.total_blocks);
        let per_block = 100.0 / f64::from(self.config.total_blocks);
        let filled = (percentage / per_block).round();
        if filled.is_nan() || filled <= 0.0 {
            0
        } else {
            (filled as usize).min(total)
        }
    }

    /// Formats `record` as `<bar> <whole percentage>%`.
    #[must_use]
    pub fn format(&self, record: &ProgressRecord) -> String {
        let total = usize::from(self.config.total_blocks);
        let filled = self.filled_blocks(record.percentage);

        let mut text = String::with_capacity(total * 3 + 6);
        text.extend(std::iter::repeat_n(self.config.filled_glyph, filled));
        text.extend(std::iter::repeat_n(self.config.empty_glyph, total - filled));
        text.push(' ');
        text.push_str(&record.whole_percentage().to_string());
        text.push('%');
        text
    }

    /// Copies the record currently displayed, never a fresh one.
    ///
    /// Before the first computation this is a no-op that returns
    /// `CopyOutcome::Skipped`.
    pub fn copy_snapshot<C, W>(
        &self,
        state: &ProgressState<C>,
        clipboard: &mut W,
    ) -> ProgressResult<CopyOutcome>
    where
        C: Clock,
        W: ClipboardCapability + ?Sized,
    {
        let Some(record) = state.read_last() else {
            warn!("clipboard copy requested before the first progress computation; skipping");
            return Ok(CopyOutcome::Skipped);
        };

        let text = self.format(record);
        clipboard.write_text(&text).map_err(|err| match err {
            ProgressError::Clipboard(_) => err,
            other => ProgressError::Clipboard(other.to_string()),
        })?;
        debug!(generation = state.generation(), %text, "copied progress snapshot");
        Ok(CopyOutcome::Copied(text))
    }
}
