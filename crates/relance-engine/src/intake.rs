use std::sync::Arc;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use relance_alerts::{send_low_score_alert, send_new_response_notification, LowScoreContext};
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_core::models::response::SurveyResponse;
use relance_scoring::{compute_score, review_redirect, triggers_alert, validate_answers, Score};
use relance_storage::error::StorageError;

use crate::error::EngineError;
use crate::Engine;

/// How long a completed questionnaire stays cached after submission, so the
/// practitioner can open the fresh response before the purge.
const RESPONSE_VIEW_TTL: SignedDuration = SignedDuration::from_hours(2);

/// Patient input, taken as raw JSON so validation produces our 400s rather
/// than a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub answers: serde_json::Value,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionOutcome {
    pub message: String,
    pub note: String,
    /// Review page the client should open after a short delay, when the
    /// score qualifies. Response-shaping only — never a server redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl Engine {
    /// Accept, score, and persist a patient's submission.
    ///
    /// The response row is a conditional create, so exactly one submission
    /// wins even if two arrive concurrently; the loser sees
    /// `AlreadyCompleted`. Notification dispatch is fire-and-forget — its
    /// failures never reach the patient.
    pub async fn submit(
        &self,
        id: Uuid,
        submission: RawSubmission,
    ) -> Result<SubmissionOutcome, EngineError> {
        let questionnaire = match self.cache.get(id) {
            Some(q) if q.status == QuestionnaireStatus::Completed => {
                return Err(EngineError::AlreadyCompleted)
            }
            Some(q) => q,
            None => return Err(self.not_found_kind(id).await),
        };

        let answers = validate_answers(&submission.answers, questionnaire.questions.len())
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        let score = compute_score(&answers);
        let now = self.cache.now();

        let response = SurveyResponse {
            questionnaire_id: id,
            answers,
            comment: submission
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            average_score: score.average,
            score_total: score.total,
            submitted_at: now,
            viewed_at: None,
        };

        match self.store.create_response(response).await {
            Ok(()) => {}
            Err(StorageError::PreconditionFailed { .. }) => {
                return Err(EngineError::AlreadyCompleted)
            }
            Err(e) => return Err(e.into()),
        }

        self.complete(&questionnaire).await;

        let mut completed = questionnaire.clone();
        completed.status = QuestionnaireStatus::Completed;
        completed.recipient_email = None;
        self.cache.put(id, completed, RESPONSE_VIEW_TTL);

        self.dispatch_notifications(&questionnaire, score);

        let redirect_url = review_redirect(&score, questionnaire.review_url.as_deref());
        let note = if redirect_url.is_some() {
            "Your answers have been shared with your practitioner. You will be \
             offered a chance to leave a public review."
        } else {
            "Your answers have been shared with your practitioner."
        };
        Ok(SubmissionOutcome {
            message: "Thank you for your response.".to_string(),
            note: note.to_string(),
            redirect_url,
        })
    }

    /// Flip the durable row to `Completed`. The conditional response create
    /// already guarantees single submission, so losing the write race here
    /// means a sweep touched the row between read and write — retry once on
    /// the reloaded version, then leave cleanup to the expiry sweep.
    async fn complete(&self, questionnaire: &Questionnaire) {
        let id = questionnaire.id;
        for _ in 0..2 {
            let versioned = match self.store.load_questionnaire(id).await {
                Ok(v) => v,
                Err(StorageError::NotFound { .. }) => {
                    // The mirror never landed; write the completed row so
                    // post-expiry lookups can still tell "completed" apart
                    // from "never existed".
                    let mut row = questionnaire.clone();
                    row.status = QuestionnaireStatus::Completed;
                    row.recipient_email = None;
                    if let Err(e) = self.store.save_questionnaire(row).await {
                        tracing::warn!(questionnaire_id = %id, error = %e, "completion write failed");
                    }
                    return;
                }
                Err(e) => {
                    tracing::warn!(questionnaire_id = %id, error = %e, "completion load failed");
                    return;
                }
            };
            if versioned.row.status == QuestionnaireStatus::Completed {
                return;
            }

            let mut row = versioned.row;
            row.status = QuestionnaireStatus::Completed;
            // A response closes the reminder window, so the PII goes too.
            row.recipient_email = None;
            match self.store.save_questionnaire_if_match(row, versioned.etag).await {
                Ok(()) => return,
                Err(StorageError::PreconditionFailed { .. }) => continue,
                Err(e) => {
                    tracing::warn!(questionnaire_id = %id, error = %e, "completion flip failed");
                    return;
                }
            }
        }
        tracing::warn!(questionnaire_id = %id, "completion flip lost two write races");
    }

    fn dispatch_notifications(&self, questionnaire: &Questionnaire, score: Score) {
        if triggers_alert(&score) {
            let store = Arc::clone(&self.store);
            let mailer = Arc::clone(&self.mailer);
            let ctx = LowScoreContext {
                questionnaire_id: questionnaire.id,
                practitioner_id: questionnaire.practitioner_id.clone(),
                patient_email: questionnaire.recipient_email.clone(),
                title: questionnaire.title.clone(),
                score_total: score.total,
                average_score: score.average,
            };
            tokio::spawn(async move {
                send_low_score_alert(store.as_ref(), mailer.as_ref(), ctx).await;
            });
        }

        let store = Arc::clone(&self.store);
        let mailer = Arc::clone(&self.mailer);
        let practitioner_id = questionnaire.practitioner_id.clone();
        let title = questionnaire.title.clone();
        tokio::spawn(async move {
            send_new_response_notification(store.as_ref(), mailer.as_ref(), practitioner_id, title)
                .await;
        });
    }
}
