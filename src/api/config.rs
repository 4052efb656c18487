use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, ProgressResult};
use crate::render::{CardStyle, ExportOptions, Viewport};

use super::validation::{validate_export_config, validate_progress_config};

/// How the discrete cadence turns interval ticks into projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscreteCadence {
    /// Every interval tick recomputes and projects right away.
    Immediate,
    /// Every tick (and every explicit trigger) arms a deferred refresh;
    /// retriggering inside `window_ms` replaces the pending one.
    Debounced { window_ms: u64 },
}

impl DiscreteCadence {
    #[must_use]
    pub fn debounce_window(self) -> Option<Duration> {
        match self {
            Self::Immediate => None,
            Self::Debounced { window_ms } => Some(Duration::from_millis(window_ms)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default = "default_total_blocks")]
    pub total_blocks: u16,
    #[serde(default = "default_filled_glyph")]
    pub filled_glyph: char,
    #[serde(default = "default_empty_glyph")]
    pub empty_glyph: char,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            total_blocks: default_total_blocks(),
            filled_glyph: default_filled_glyph(),
            empty_glyph: default_empty_glyph(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_target")]
    pub target: String,
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    #[serde(default = "default_export_width")]
    pub width: u32,
    #[serde(default = "default_export_height")]
    pub height: u32,
    #[serde(default = "default_export_scale")]
    pub scale: f64,
    #[serde(default)]
    pub style: CardStyle,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            target: default_export_target(),
            file_stem: default_file_stem(),
            width: default_export_width(),
            height: default_export_height(),
            scale: default_export_scale(),
            style: CardStyle::default(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> ProgressResult<()> {
        validate_export_config(self)
    }

    #[must_use]
    pub fn options(&self) -> ExportOptions {
        ExportOptions {
            viewport: Viewport::new(self.width, self.height),
            scale: self.scale,
            style: self.style,
        }
    }
}

/// Host-supplied configuration for cadences and snapshot consumers.
///
/// Serializable so hosts can persist it next to their theme/language
/// preferences; every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Frame period of virtual-time hosts (`ManualEventLoop::from_config`).
    /// Real hosts pace frames with the display and ignore it.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_discrete_interval_ms")]
    pub discrete_interval_ms: u64,
    #[serde(default = "default_discrete_cadence")]
    pub discrete_cadence: DiscreteCadence,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            discrete_interval_ms: default_discrete_interval_ms(),
            discrete_cadence: default_discrete_cadence(),
            clipboard: ClipboardConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl ProgressConfig {
    /// Sets the discrete interval period.
    #[must_use]
    pub fn with_discrete_interval_ms(mut self, interval_ms: u64) -> Self {
        self.discrete_interval_ms = interval_ms;
        self
    }

    /// Sets the discrete cadence mode.
    #[must_use]
    pub fn with_discrete_cadence(mut self, cadence: DiscreteCadence) -> Self {
        self.discrete_cadence = cadence;
        self
    }

    /// Sets the frame period used by virtual-time hosts.
    #[must_use]
    pub fn with_frame_interval_ms(mut self, frame_interval_ms: u64) -> Self {
        self.frame_interval_ms = frame_interval_ms;
        self
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: ClipboardConfig) -> Self {
        self.clipboard = clipboard;
        self
    }

    #[must_use]
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    #[must_use]
    pub fn discrete_interval(&self) -> Duration {
        Duration::from_millis(self.discrete_interval_ms)
    }

    pub fn validate(&self) -> ProgressResult<()> {
        validate_progress_config(self)
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(input: &str) -> ProgressResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ProgressError::InvalidConfig(format!("failed to parse config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ProgressResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ProgressError::InvalidConfig(format!("failed to serialize config json: {e}"))
        })
    }
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_discrete_interval_ms() -> u64 {
    1_000
}

fn default_discrete_cadence() -> DiscreteCadence {
    DiscreteCadence::Debounced { window_ms: 100 }
}

fn default_total_blocks() -> u16 {
    20
}

fn default_filled_glyph() -> char {
    '▓'
}

fn default_empty_glyph() -> char {
    '░'
}

fn default_export_target() -> String {
    "progress-card".to_owned()
}

fn default_file_stem() -> String {
    "year-progress".to_owned()
}

fn default_export_width() -> u32 {
    640
}

fn default_export_height() -> u32 {
    200
}

fn default_export_scale() -> f64 {
    2.0
}

