use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A patient's answer set for one questionnaire.
///
/// Created exactly once per questionnaire; deleted with its parent at
/// expiry. `answers` aligns positionally with the parent's questions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveyResponse {
    pub questionnaire_id: Uuid,
    /// One integer in [1,5] per question.
    pub answers: Vec<u8>,
    pub comment: Option<String>,
    /// `mean(answers)`, unrounded.
    pub average_score: f64,
    /// `round(clamp(average_score, 1, 5))`.
    pub score_total: u8,
    pub submitted_at: jiff::Timestamp,
    /// Stamped when the practitioner first opens the response.
    pub viewed_at: Option<jiff::Timestamp>,
}
