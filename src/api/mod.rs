mod clipboard;
mod config;
mod export;
mod progress_state;
mod projection;
mod scheduler;
mod snapshot;
mod validation;
mod visibility;

pub use clipboard::{ClipboardCapability, ClipboardFormatter, CopyOutcome};
pub use config::{ClipboardConfig, DiscreteCadence, ExportConfig, ProgressConfig};
pub use export::{ExportTrigger, ExportedImage, PendingExport};
pub use progress_state::ProgressState;
pub use projection::{FnProjection, NoopProjection, Projection};
pub use scheduler::{
    ExportTicket, PendingDebounce, RefreshScheduler, SchedulerMode, SchedulerState,
    SchedulerStats, SchedulerTiming,
};
pub use snapshot::{PROGRESS_SNAPSHOT_JSON_SCHEMA_V1, ProgressSnapshotJsonContractV1};
pub use visibility::{RefreshControl, Visibility, VisibilityGate};
