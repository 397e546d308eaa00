use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::question::Question;

/// Delivery/response state of a questionnaire. One-way ratchet:
/// `Pending`/`Scheduled` → `Sent` → `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionnaireStatus {
    Pending,
    Scheduled,
    Sent,
    Completed,
}

impl QuestionnaireStatus {
    /// Statuses the delivery sweep may still act on.
    pub fn is_deliverable(self) -> bool {
        matches!(self, Self::Pending | Self::Scheduled)
    }
}

/// An ephemeral questionnaire sent to one patient, valid for a bounded
/// time window.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Questionnaire {
    pub id: Uuid,
    /// Owning practitioner. Authorization checks compare against this.
    pub practitioner_id: String,
    pub title: String,
    pub questions: Vec<Question>,
    /// Patient email. Purged once the reminder window closes — never
    /// rendered to patients, never restored.
    pub recipient_email: Option<String>,
    /// Days after creation before the delivery sweep sends the email.
    pub send_after_days: Option<i64>,
    pub scheduled: bool,
    pub status: QuestionnaireStatus,
    /// External review page the patient is redirected to on a high score.
    pub review_url: Option<String>,
    pub created_at: jiff::Timestamp,
    /// `created_at + 14 days` when scheduled, `created_at + 2 hours`
    /// otherwise. Fixed at creation, never recomputed after send.
    pub expires_at: jiff::Timestamp,
    pub sent_at: Option<jiff::Timestamp>,
    pub reminder_sent_at: Option<jiff::Timestamp>,
    #[serde(default)]
    pub is_favorite: bool,
}
