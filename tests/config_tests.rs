use approx::assert_relative_eq;
use chrono::{FixedOffset, TimeZone};
use year_progress::ProgressError;
use year_progress::api::{
    ClipboardConfig, DiscreteCadence, ExportConfig, ExportTrigger,
    PROGRESS_SNAPSHOT_JSON_SCHEMA_V1, ProgressConfig, ProgressSnapshotJsonContractV1,
};
use year_progress::core::{ProgressRecord, compute_progress};

fn sample_record() -> ProgressRecord {
    let instant = FixedOffset::east_opt(2 * 3600)
        .expect("offset")
        .with_ymd_and_hms(2024, 6, 1, 14, 0, 0)
        .single()
        .expect("instant");
    compute_progress(&instant)
}

#[test]
fn default_config_is_valid_and_round_trips_through_json() {
    let config = ProgressConfig::default()
        .with_discrete_interval_ms(750)
        .with_discrete_cadence(DiscreteCadence::Immediate);
    config.validate().expect("default config valid");

    let json = config.to_json_pretty().expect("serialize");
    let parsed = ProgressConfig::from_json_str(&json).expect("parse");

    assert_eq!(parsed.frame_interval_ms, config.frame_interval_ms);
    assert_eq!(parsed.discrete_interval_ms, 750);
    assert_eq!(parsed.discrete_cadence, DiscreteCadence::Immediate);
    assert_eq!(parsed.clipboard, config.clipboard);
    assert_eq!(parsed.export.target, config.export.target);
    assert_eq!(parsed.export.file_stem, config.export.file_stem);
    assert_relative_eq!(parsed.export.scale, config.export.scale);
    assert_relative_eq!(parsed.export.style.accent.blue, config.export.style.accent.blue);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let parsed = ProgressConfig::from_json_str(r#"{ "discrete_interval_ms": 2000 }"#)
        .expect("partial config");
    let defaults = ProgressConfig::default();

    assert_eq!(parsed.discrete_interval_ms, 2_000);
    assert_eq!(parsed.frame_interval_ms, defaults.frame_interval_ms);
    assert_eq!(
        parsed.discrete_cadence,
        DiscreteCadence::Debounced { window_ms: 100 }
    );
    assert_eq!(parsed.clipboard.total_blocks, 20);
    assert_eq!(parsed.export.width, 640);
    assert_eq!(parsed.export.height, 200);
}

#[test]
fn cadence_is_tagged_by_mode() {
    let parsed = ProgressConfig::from_json_str(
        r#"{ "discrete_cadence": { "mode": "debounced", "window_ms": 250 } }"#,
    )
    .expect("debounced cadence");
    assert_eq!(
        parsed.discrete_cadence,
        DiscreteCadence::Debounced { window_ms: 250 }
    );

    let parsed = ProgressConfig::from_json_str(r#"{ "discrete_cadence": { "mode": "immediate" } }"#)
        .expect("immediate cadence");
    assert_eq!(parsed.discrete_cadence, DiscreteCadence::Immediate);
    assert_eq!(parsed.discrete_cadence.debounce_window(), None);
}

#[test]
fn invalid_values_are_rejected_as_config_errors() {
    let cases = [
        ProgressConfig::default().with_frame_interval_ms(0),
        ProgressConfig::default().with_discrete_interval_ms(0),
        ProgressConfig::default().with_discrete_cadence(DiscreteCadence::Debounced { window_ms: 0 }),
        ProgressConfig::default().with_clipboard(ClipboardConfig {
            total_blocks: 0,
            ..ClipboardConfig::default()
        }),
        ProgressConfig::default().with_clipboard(ClipboardConfig {
            filled_glyph: ' ',
            ..ClipboardConfig::default()
        }),
        ProgressConfig::default().with_export(ExportConfig {
            file_stem: "../escape".to_owned(),
            ..ExportConfig::default()
        }),
        ProgressConfig::default().with_export(ExportConfig {
            target: "   ".to_owned(),
            ..ExportConfig::default()
        }),
        ProgressConfig::default().with_export(ExportConfig {
            width: 0,
            ..ExportConfig::default()
        }),
        ProgressConfig::default().with_export(ExportConfig {
            scale: 9.0,
            ..ExportConfig::default()
        }),
    ];

    for config in cases {
        let err = config.validate().expect_err("invalid config");
        assert!(
            matches!(err, ProgressError::InvalidConfig(_)),
            "unexpected error: {err:?}"
        );
    }
}

#[test]
fn debounce_window_must_be_shorter_than_the_discrete_interval() {
    for window_ms in [1_000, 1_500] {
        let err = ProgressConfig::default()
            .with_discrete_interval_ms(1_000)
            .with_discrete_cadence(DiscreteCadence::Debounced { window_ms })
            .validate()
            .expect_err("window reaching the next tick");
        assert!(matches!(err, ProgressError::InvalidConfig(_)));
        let message = err.to_string();
        assert!(message.contains("window_ms"));
        assert!(message.contains("discrete_interval_ms"));
    }

    ProgressConfig::default()
        .with_discrete_interval_ms(1_000)
        .with_discrete_cadence(DiscreteCadence::Debounced { window_ms: 999 })
        .validate()
        .expect("window just under the interval");
}

#[test]
fn export_trigger_rejects_invalid_export_settings() {
    let cases = [
        ExportConfig {
            scale: f64::NAN,
            ..ExportConfig::default()
        },
        ExportConfig {
            target: String::new(),
            ..ExportConfig::default()
        },
        ExportConfig {
            height: 0,
            ..ExportConfig::default()
        },
    ];
    for export in &cases {
        let err = ExportTrigger::from_config(export).expect_err("invalid export config");
        assert!(
            matches!(err, ProgressError::InvalidConfig(_)),
            "unexpected error: {err:?}"
        );
    }

    let trigger = ExportTrigger::from_config(&ExportConfig::default()).expect("default export");
    assert_eq!(trigger, ExportTrigger::default());
    assert_eq!(trigger.target(), ExportConfig::default().target);
}

#[test]
fn invalid_style_color_is_a_config_error() {
    let mut export = ExportConfig::default();
    export.style.accent.alpha = 1.5;
    let err = ProgressConfig::default()
        .with_export(export)
        .validate()
        .expect_err("bad color");

    assert!(matches!(err, ProgressError::InvalidConfig(_)));
    assert!(err.to_string().contains("export style"));
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = ProgressConfig::from_json_str("{ not json").expect_err("malformed");
    assert!(matches!(err, ProgressError::InvalidConfig(_)));

    let err = ProgressConfig::from_json_str(r#"{ "frame_interval_ms": 0 }"#)
        .expect_err("parsed but invalid");
    assert!(err.to_string().contains("frame_interval_ms"));
}

#[test]
fn snapshot_contract_round_trips_through_envelope_and_bare_record() {
    let record = sample_record();
    let json = record.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));

    let envelope: ProgressSnapshotJsonContractV1 =
        serde_json::from_str(&json).expect("envelope parse");
    assert_eq!(envelope.schema_version, PROGRESS_SNAPSHOT_JSON_SCHEMA_V1);

    let decoded = ProgressRecord::from_json_compat_str(&json).expect("compat parse");
    assert_eq!(decoded.instant, record.instant);
    assert_eq!(decoded.instant.offset(), record.instant.offset());
    assert_eq!(decoded.year_start, record.year_start);
    assert_eq!(decoded.days_passed, record.days_passed);
    assert_eq!(decoded.days_remaining, record.days_remaining);
    assert_eq!(decoded.percentage_text, record.percentage_text);
    assert_relative_eq!(decoded.fraction_elapsed, record.fraction_elapsed, epsilon = 1e-15);

    let bare = serde_json::to_string(&record).expect("bare serialize");
    let decoded = ProgressRecord::from_json_compat_str(&bare).expect("bare parse");
    assert_eq!(decoded.year, 2024);
    assert_eq!(decoded.total_days_in_year, 366);
}

#[test]
fn snapshot_contract_rejects_unknown_schema_versions() {
    let record = sample_record();
    let json = record
        .to_json_contract_v1_pretty()
        .expect("serialize")
        .replace("\"schema_version\": 1", "\"schema_version\": 2");

    let err = ProgressRecord::from_json_compat_str(&json).expect_err("schema 2");
    assert!(err.to_string().contains("unsupported progress snapshot schema version: 2"));

    let err = ProgressRecord::from_json_compat_str("[]").expect_err("garbage");
    assert!(matches!(err, ProgressError::InvalidData(_)));
}
