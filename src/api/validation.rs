use crate::error::{ProgressError, ProgressResult};

use super::{ClipboardConfig, DiscreteCadence, ExportConfig, ProgressConfig};

const MAX_CLIPBOARD_BLOCKS: u16 = 200;
const MAX_EXPORT_SCALE: f64 = 8.0;

pub(super) fn validate_progress_config(config: &ProgressConfig) -> ProgressResult<()> {
    if config.frame_interval_ms == 0 {
        return Err(ProgressError::InvalidConfig(
            "frame_interval_ms must be > 0".to_owned(),
        ));
    }
    if config.discrete_interval_ms == 0 {
        return Err(ProgressError::InvalidConfig(
            "discrete_interval_ms must be > 0".to_owned(),
        ));
    }
    if let DiscreteCadence::Debounced { window_ms } = config.discrete_cadence {
        if window_ms == 0 {
            return Err(ProgressError::InvalidConfig(
                "debounce window_ms must be > 0".to_owned(),
            ));
        }
        // Each interval tick rearms the debounce, so a window reaching the next
        // tick would never fire.
        if window_ms >= config.discrete_interval_ms {
            return Err(ProgressError::InvalidConfig(format!(
                "debounce window_ms ({window_ms}) must be < discrete_interval_ms ({})",
                config.discrete_interval_ms
            )));
        }
    }

    validate_clipboard_config(config.clipboard)?;
    validate_export_config(&config.export)
}

pub(super) fn validate_clipboard_config(config: ClipboardConfig) -> ProgressResult<ClipboardConfig> {
    if !(1..=MAX_CLIPBOARD_BLOCKS).contains(&config.total_blocks) {
        return Err(ProgressError::InvalidConfig(format!(
            "clipboard total_blocks must be in 1..={MAX_CLIPBOARD_BLOCKS}"
        )));
    }
    for (name, glyph) in [
        ("filled_glyph", config.filled_glyph),
        ("empty_glyph", config.empty_glyph),
    ] {
        if glyph.is_control() || glyph.is_whitespace() {
            return Err(ProgressError::InvalidConfig(format!(
                "clipboard {name} must be a visible character"
            )));
        }
    }
    if config.filled_glyph == config.empty_glyph {
        return Err(ProgressError::InvalidConfig(
            "clipboard filled and empty glyphs must differ".to_owned(),
        ));
    }
    Ok(config)
}

pub(super) fn validate_export_config(config: &ExportConfig) -> ProgressResult<()> {
    if config.target.trim().is_empty() {
        return Err(ProgressError::InvalidConfig(
            "export target must not be empty".to_owned(),
        ));
    }
    if config.file_stem.trim().is_empty()
        || config
            .file_stem
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(ProgressError::InvalidConfig(
            "export file_stem must be a non-empty plain file name".to_owned(),
        ));
    }
    if config.width == 0 || config.height == 0 {
        return Err(ProgressError::InvalidConfig(format!(
            "export size must be > 0, got {}x{}",
            config.width, config.height
        )));
    }
    if !config.scale.is_finite() || config.scale <= 0.0 || config.scale > MAX_EXPORT_SCALE {
        return Err(ProgressError::InvalidConfig(format!(
            "export scale must be finite and in (0, {MAX_EXPORT_SCALE}]"
        )));
    }
    config
        .style
        .validate()
        .map_err(|err| ProgressError::InvalidConfig(format!("export style: {err}")))?;
    Ok(())
}
