use crate::error::ProgressResult;
use crate::render::{ExportOptions, ExportScope, RenderCapability, build_progress_card_frame};

/// Headless render capability used by tests and hosts without a raster backend.
///
/// It still lays out and validates the full card so invalid geometry is
/// caught, but produces no image bytes.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_rect_count: usize,
    pub last_text_count: usize,
    pub last_fraction: Option<f64>,
    pub render_count: usize,
}

impl RenderCapability for NullRenderer {
    fn render_to_image(
        &mut self,
        scope: &ExportScope<'_>,
        options: &ExportOptions,
    ) -> ProgressResult<Vec<u8>> {
        let frame = build_progress_card_frame(scope.record, options.viewport, options.style)?;
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        self.last_fraction = Some(scope.record.fraction_elapsed);
        self.render_count += 1;
        Ok(Vec::new())
    }
}
