//! Opt-in `tracing` setup for hosts that run the refresh scheduler.
//!
//! The scheduler, visibility gate and snapshot consumers log under the
//! `year_progress` target. Hosts with their own subscriber can skip this.

/// Filter used when `RUST_LOG` is unset: scheduler lifecycle at `info`,
/// everything else at `warn`.
pub const DEFAULT_TRACING_DIRECTIVE: &str = "warn,year_progress=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_TRACING_DIRECTIVE`].
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default(DEFAULT_TRACING_DIRECTIVE)
}

/// Installs a compact subscriber filtered by `RUST_LOG`, falling back to
/// `directive` when the variable is unset or unparsable.
///
/// Returns `false` when the `telemetry` feature is disabled, `directive` does
/// not parse, or a global subscriber is already installed.
#[must_use]
pub fn init_tracing_with_default(directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match EnvFilter::try_new(directive) {
                Ok(filter) => filter,
                Err(_) => return false,
            },
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directive;
        false
    }
}
