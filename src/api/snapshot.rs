use serde::{Deserialize, Serialize};

use crate::core::ProgressRecord;
use crate::error::{ProgressError, ProgressResult};

pub const PROGRESS_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Versioned JSON envelope for one progress record, used by tooling and
/// regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub record: ProgressRecord,
}

impl ProgressRecord {
    pub fn to_json_contract_v1_pretty(&self) -> ProgressResult<String> {
        let payload = ProgressSnapshotJsonContractV1 {
            schema_version: PROGRESS_SNAPSHOT_JSON_SCHEMA_V1,
            record: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ProgressError::InvalidData(format!("failed to serialize progress snapshot v1: {e}"))
        })
    }

    /// Accepts either a bare record or a v1 envelope.
    pub fn from_json_compat_str(input: &str) -> ProgressResult<Self> {
        if let Ok(record) = serde_json::from_str::<ProgressRecord>(input) {
            return Ok(record);
        }
        let payload: ProgressSnapshotJsonContractV1 =
            serde_json::from_str(input).map_err(|e| {
                ProgressError::InvalidData(format!("failed to parse progress snapshot json: {e}"))
            })?;
        if payload.schema_version != PROGRESS_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ProgressError::InvalidData(format!(
                "unsupported progress snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.record)
    }
}
