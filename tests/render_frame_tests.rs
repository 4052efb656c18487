use approx::assert_relative_eq;
use chrono::{FixedOffset, TimeZone};
use year_progress::ProgressError;
use year_progress::core::{ProgressRecord, compute_progress};
use year_progress::render::{
    CardStyle, Color, ExportOptions, ExportScope, NullRenderer, RenderCapability, TextWeight,
    Viewport, build_progress_card_frame,
};

fn record_at(y: i32, mo: u32, d: u32, h: u32) -> ProgressRecord {
    let instant = FixedOffset::east_opt(0)
        .expect("offset")
        .with_ymd_and_hms(y, mo, d, h, 0, 0)
        .single()
        .expect("instant");
    compute_progress(&instant)
}

#[test]
fn progress_card_contains_background_track_fill_and_labels() {
    let record = record_at(2024, 6, 1, 12);
    let frame = build_progress_card_frame(&record, Viewport::new(640, 200), CardStyle::default())
        .expect("build frame");
    frame.validate().expect("valid frame");

    assert_eq!(frame.rects.len(), 3, "background, track and fill");
    assert_eq!(frame.texts.len(), 4, "year, percentage and two counters");

    let track = frame.rects[1];
    let fill = frame.rects[2];
    assert_relative_eq!(fill.width, track.width * record.fraction_elapsed, epsilon = 1e-9);
    assert_relative_eq!(fill.x, track.x);
    assert_eq!(fill.fill_color, CardStyle::default().accent);

    let labels: Vec<&str> = frame.texts.iter().map(|text| text.text.as_str()).collect();
    assert_eq!(
        labels,
        vec!["2024", "41.666667%", "152 days passed", "213 days left"]
    );
    let weights: Vec<TextWeight> = frame.texts.iter().map(|text| text.weight).collect();
    assert_eq!(
        weights,
        vec![
            TextWeight::Bold,
            TextWeight::Bold,
            TextWeight::Regular,
            TextWeight::Regular
        ]
    );
}

#[test]
fn rgb8_colors_map_to_unit_channels() {
    let color = Color::from_rgb8(255, 0, 51);
    assert_relative_eq!(color.red, 1.0);
    assert_relative_eq!(color.green, 0.0);
    assert_relative_eq!(color.blue, 0.2);
    assert_relative_eq!(color.alpha, 1.0);
    color.validate().expect("valid color");
}

#[test]
fn year_start_produces_empty_but_valid_fill() {
    let record = record_at(2023, 1, 1, 0);
    let frame = build_progress_card_frame(&record, Viewport::new(320, 120), CardStyle::default())
        .expect("build frame");

    assert_relative_eq!(frame.rects[2].width, 0.0);
    assert_relative_eq!(frame.rects[2].corner_radius, 0.0);
    frame.validate().expect("zero-width fill is valid");
    assert_eq!(frame.texts[2].text, "0 days passed");
    assert_eq!(frame.texts[3].text, "365 days left");
    assert!(!frame.is_empty());
}

#[test]
fn invalid_viewport_is_rejected() {
    let record = record_at(2024, 6, 1, 12);
    let err = build_progress_card_frame(&record, Viewport::new(0, 200), CardStyle::default())
        .expect_err("zero width");

    assert!(matches!(
        err,
        ProgressError::InvalidViewport {
            width: 0,
            height: 200
        }
    ));
}

#[test]
fn invalid_style_color_fails_frame_validation() {
    let record = record_at(2024, 6, 1, 12);
    let mut style = CardStyle::default();
    style.track.red = f64::NAN;

    let err = build_progress_card_frame(&record, Viewport::new(640, 200), style)
        .expect_err("nan channel");
    assert!(matches!(err, ProgressError::InvalidData(_)));
}

#[test]
fn null_renderer_lays_out_the_card_without_bytes() {
    let record = record_at(2024, 6, 1, 12);
    let mut renderer = NullRenderer::default();
    let scope = ExportScope {
        target: "progress-card",
        record: &record,
    };

    let bytes = renderer
        .render_to_image(&scope, &ExportOptions::default())
        .expect("render");

    assert!(bytes.is_empty());
    assert_eq!(renderer.render_count, 1);
    assert_eq!(renderer.last_rect_count, 3);
    assert_eq!(renderer.last_text_count, 4);
    assert_eq!(renderer.last_fraction, Some(record.fraction_elapsed));
    assert_eq!(renderer.media_type(), "image/png");
}

#[test]
fn export_options_scale_the_output_size() {
    let options = ExportOptions::default();
    assert_eq!(options.output_size(), Viewport::new(1280, 400));

    let tiny = ExportOptions {
        viewport: Viewport::new(1, 1),
        scale: 0.25,
        ..ExportOptions::default()
    };
    assert_eq!(tiny.output_size(), Viewport::new(1, 1));
}
