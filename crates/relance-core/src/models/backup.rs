use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BackupStatus {
    Processing,
    Completed,
    Failed,
}

/// Tracks the best-effort durable mirror of an ephemeral questionnaire.
/// `Processing` is written before the mirror write, then overwritten with
/// `Completed` or `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BackupLogEntry {
    pub questionnaire_id: Uuid,
    pub status: BackupStatus,
    pub detail: Option<String>,
    pub created_at: jiff::Timestamp,
}
