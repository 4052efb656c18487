use serde::{Deserialize, Serialize};

use crate::core::ProgressRecord;
use crate::error::{ProgressError, ProgressResult};
use crate::render::{
    Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextWeight, Viewport,
};

/// Palette of the exported progress card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardStyle {
    pub background: Color,
    pub track: Color,
    pub accent: Color,
    pub text: Color,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgb8(250, 250, 247),
            track: Color::from_rgb8(222, 224, 230),
            accent: Color::from_rgb8(41, 128, 186),
            text: Color::from_rgb8(33, 36, 41),
        }
    }
}

impl CardStyle {
    pub fn validate(self) -> ProgressResult<Self> {
        self.background.validate()?;
        self.track.validate()?;
        self.accent.validate()?;
        self.text.validate()?;
        Ok(self)
    }
}

/// Lays out the progress card for `record` in logical pixels.
///
/// The card shows the year, the six-decimal percentage, a bar whose fill
/// width is proportional to `fraction_elapsed`, and the days passed and
/// left, both counted in whole elapsed days.
pub fn build_progress_card_frame(
    record: &ProgressRecord,
    viewport: Viewport,
    style: CardStyle,
) -> ProgressResult<RenderFrame> {
    if !viewport.is_valid() {
        return Err(ProgressError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let padding = (height * 0.12).max(1.0);
    let headline_px = (height * 0.16).max(1.0);
    let caption_px = (height * 0.10).max(1.0);

    let track_x = padding;
    let track_y = height * 0.45;
    let track_width = (width - 2.0 * padding).max(0.0);
    let track_height = height * 0.16;
    let fill_width = track_width * record.fraction_elapsed.clamp(0.0, 1.0);
    let bar_radius = track_height * 0.5;

    let frame = RenderFrame::new(viewport)
        .with_rect(
            RectPrimitive::new(0.0, 0.0, width, height, style.background)
                .with_corner_radius(padding),
        )
        .with_rect(
            RectPrimitive::new(track_x, track_y, track_width, track_height, style.track)
                .with_corner_radius(bar_radius),
        )
        .with_rect(
            RectPrimitive::new(track_x, track_y, fill_width, track_height, style.accent)
                .with_corner_radius(bar_radius.min(fill_width * 0.5)),
        )
        .with_text(
            TextPrimitive::new(
                record.year.to_string(),
                padding,
                padding,
                headline_px,
                style.text,
                TextHAlign::Left,
            )
            .with_weight(TextWeight::Bold),
        )
        .with_text(
            TextPrimitive::new(
                format!("{}%", record.percentage_text),
                width - padding,
                padding,
                headline_px,
                style.accent,
                TextHAlign::Right,
            )
            .with_weight(TextWeight::Bold),
        )
        .with_text(TextPrimitive::new(
            format!("{} days passed", record.days_passed),
            padding,
            height - padding - caption_px,
            caption_px,
            style.text,
            TextHAlign::Left,
        ))
        .with_text(TextPrimitive::new(
            format!("{} days left", record.days_remaining),
            width - padding,
            height - padding - caption_px,
            caption_px,
            style.text,
            TextHAlign::Right,
        ));

    frame.validate()?;
    Ok(frame)
}
