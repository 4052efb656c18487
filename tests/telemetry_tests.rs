use year_progress::telemetry::{DEFAULT_TRACING_DIRECTIVE, init_default_tracing};

#[cfg(feature = "telemetry")]
#[test]
fn default_tracing_installs_once_then_defers_to_the_existing_subscriber() {
    assert!(DEFAULT_TRACING_DIRECTIVE.contains("year_progress=info"));
    assert!(init_default_tracing(), "first install");
    assert!(!init_default_tracing(), "global subscriber already set");
    tracing::info!(target: "year_progress", "telemetry smoke event");
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn default_tracing_is_a_no_op_without_the_feature() {
    assert!(!DEFAULT_TRACING_DIRECTIVE.is_empty());
    assert!(!init_default_tracing());
    assert!(!year_progress::telemetry::init_tracing_with_default("info"));
}
