use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Audit-trail row for a low-score alert. Append-only — written once with
/// the delivery outcome, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AlertLogEntry {
    pub id: Uuid,
    pub questionnaire_id: Uuid,
    pub practitioner_id: String,
    /// Patient email if still available at alert time (may already be
    /// redacted).
    pub patient_email: Option<String>,
    pub score_total: u8,
    pub average_score: f64,
    /// Whether the alert email actually went out. The row exists either way.
    pub alert_sent: bool,
    pub created_at: jiff::Timestamp,
}
