use thiserror::Error;

pub type ProgressResult<T> = Result<T, ProgressError>;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("no progress record has been computed yet")]
    NotComputed,

    #[error("an export is already in flight")]
    ExportBusy,

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("render capability failed: {0}")]
    Render(String),

    #[error("projection failed: {0}")]
    Projection(String),
}

impl ProgressError {
    /// Returns `true` for failures reported by an external capability
    /// (clipboard or renderer) rather than by the core itself.
    #[must_use]
    pub fn is_capability_error(&self) -> bool {
        matches!(self, Self::Clipboard(_) | Self::Render(_))
    }
}
