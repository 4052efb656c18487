mod frame;
mod null_renderer;
mod primitives;
mod progress_card;

pub use frame::{RenderFrame, Viewport};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, RectPrimitive, TextHAlign, TextPrimitive, TextWeight};
pub use progress_card::{CardStyle, build_progress_card_frame};

use serde::{Deserialize, Serialize};

use crate::core::ProgressRecord;
use crate::error::ProgressResult;

/// What an export captures: a named target region and the record it displays.
#[derive(Debug, Clone, Copy)]
pub struct ExportScope<'a> {
    pub target: &'a str,
    pub record: &'a ProgressRecord,
}

/// Output parameters for one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Logical card size before `scale` is applied.
    pub viewport: Viewport,
    /// Device pixel ratio of the produced image.
    pub scale: f64,
    pub style: CardStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(640, 200),
            scale: 2.0,
            style: CardStyle::default(),
        }
    }
}

impl ExportOptions {
    /// Pixel size of the produced image.
    #[must_use]
    pub fn output_size(&self) -> Viewport {
        let scaled = |logical: u32| (f64::from(logical) * self.scale).round().max(1.0) as u32;
        Viewport::new(scaled(self.viewport.width), scaled(self.viewport.height))
    }
}

/// Capability that serializes the current visual state to image bytes.
///
/// Implementations report failures (missing target, unavailable backend) as
/// errors. The export trigger resumes the scheduler regardless.
pub trait RenderCapability {
    fn render_to_image(
        &mut self,
        scope: &ExportScope<'_>,
        options: &ExportOptions,
    ) -> ProgressResult<Vec<u8>>;

    /// MIME type of the bytes returned by `render_to_image`.
    fn media_type(&self) -> &'static str {
        "image/png"
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoPngRenderer, CairoRenderStats};
