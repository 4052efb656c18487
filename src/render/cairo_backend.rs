use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{ProgressError, ProgressResult};
use crate::render::{
    Color, ExportOptions, ExportScope, RectPrimitive, RenderCapability, RenderFrame, TextHAlign,
    build_progress_card_frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    pub bytes_written: usize,
}

/// Cairo + Pango + PangoCairo PNG exporter for the progress card.
///
/// Each export rasterizes into a fresh offscreen image surface sized by
/// `ExportOptions::output_size` and encodes it as PNG.
#[derive(Debug)]
pub struct CairoPngRenderer {
    target: String,
    font_family: String,
    last_stats: CairoRenderStats,
}

impl CairoPngRenderer {
    /// Creates an exporter that serves exactly one export target.
    pub fn new(target: impl Into<String>) -> ProgressResult<Self> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(ProgressError::InvalidData(
                "cairo export target must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            target,
            font_family: "Sans".to_owned(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn draw(&self, context: &Context, frame: &RenderFrame) -> ProgressResult<CairoRenderStats> {
        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            if rect.width <= 0.0 || rect.height <= 0.0 {
                continue;
            }
            append_rect_path(context, *rect);
            apply_color(context, rect.fill_color);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            stats.rects_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description = FontDescription::from_string(&format!(
                "{} {} {}",
                self.font_family,
                text.weight.font_style_word(),
                text.font_size_px
            ));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        Ok(stats)
    }
}

impl RenderCapability for CairoPngRenderer {
    fn render_to_image(
        &mut self,
        scope: &ExportScope<'_>,
        options: &ExportOptions,
    ) -> ProgressResult<Vec<u8>> {
        if scope.target != self.target {
            return Err(ProgressError::Render(format!(
                "export target `{}` is not available (renderer serves `{}`)",
                scope.target, self.target
            )));
        }
        if !options.scale.is_finite() || options.scale <= 0.0 {
            return Err(ProgressError::Render(
                "export scale must be finite and > 0".to_owned(),
            ));
        }

        let frame = build_progress_card_frame(scope.record, options.viewport, options.style)?;
        let size = options.output_size();
        let width = i32::try_from(size.width)
            .map_err(|_| ProgressError::Render("export width exceeds i32".to_owned()))?;
        let height = i32::try_from(size.height)
            .map_err(|_| ProgressError::Render("export height exceeds i32".to_owned()))?;

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let mut stats = {
            let context = Context::new(&surface)
                .map_err(|err| map_backend_error("failed to create cairo context", err))?;
            context.scale(options.scale, options.scale);
            self.draw(&context, &frame)?
        };
        surface.flush();

        let mut bytes = Vec::new();
        surface
            .write_to_png(&mut bytes)
            .map_err(|err| ProgressError::Render(format!("failed to encode png: {err}")))?;
        stats.bytes_written = bytes.len();
        self.last_stats = stats;
        Ok(bytes)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ProgressError {
    ProgressError::Render(format!("{prefix}: {err}"))
}
