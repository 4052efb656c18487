use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProgressError;

/// Page visibility as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => f.write_str("visible"),
            Self::Hidden => f.write_str("hidden"),
        }
    }
}

impl FromStr for Visibility {
    type Err = ProgressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Ok(Self::Visible),
            // Browsers report prerendered/unloaded documents with extra states;
            // neither should keep timers alive.
            "hidden" | "prerender" | "unloaded" => Ok(Self::Hidden),
            other => Err(ProgressError::InvalidData(format!(
                "unknown visibility state `{other}`"
            ))),
        }
    }
}

/// Start/stop surface driven by the visibility gate.
///
/// Implementations must make every method idempotent.
pub trait RefreshControl {
    fn start(&mut self);
    fn stop(&mut self);
    fn teardown(&mut self);
}

/// Translates visibility transitions into refresh commands.
///
/// The gate is stateless: duplicate notifications are forwarded as-is and
/// absorbed by the idempotence of the `RefreshControl` behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityGate;

impl VisibilityGate {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn on_transition<R: RefreshControl + ?Sized>(&self, control: &mut R, visibility: Visibility) {
        debug!(%visibility, "visibility transition");
        match visibility {
            Visibility::Visible => control.start(),
            Visibility::Hidden => control.stop(),
        }
    }

    pub fn on_unload<R: RefreshControl + ?Sized>(&self, control: &mut R) {
        debug!("page unload");
        control.teardown();
    }
}
