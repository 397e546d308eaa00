use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use relance_core::models::backup::{BackupLogEntry, BackupStatus};
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_scoring::normalize_questions;
use relance_storage::error::StorageError;
use relance_storage::rows::RowStore;

use crate::error::{or_not_found, EngineError};
use crate::Engine;

/// Lifetime of a scheduled questionnaire.
const SCHEDULED_TTL: SignedDuration = SignedDuration::from_hours(14 * 24);
/// Lifetime of an immediate (share-the-link-now) questionnaire.
const IMMEDIATE_TTL: SignedDuration = SignedDuration::from_hours(2);

const DEFAULT_DELAY_DAYS: i64 = 14;
const MIN_DELAY_DAYS: i64 = 1;

/// Practitioner input for a new questionnaire. Questions arrive in the
/// loose client shape and are normalized before anything is stored.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionnaire {
    pub title: String,
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
    #[serde(default)]
    pub scheduled: bool,
    #[serde(default)]
    pub send_after_days: Option<i64>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub review_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: Uuid,
    pub link: String,
    pub expires_at: Timestamp,
}

/// Dashboard listing row, enriched with response state.
#[derive(Debug, Serialize)]
pub struct QuestionnaireSummary {
    pub id: Uuid,
    pub title: String,
    pub question_count: usize,
    pub status: QuestionnaireStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub has_response: bool,
    pub response_viewed: bool,
    pub is_favorite: bool,
}

impl Engine {
    /// Create a questionnaire, cache it for its full lifetime, and mirror it
    /// to durable storage in the background.
    pub async fn create(
        &self,
        practitioner_id: &str,
        req: CreateQuestionnaire,
    ) -> Result<Created, EngineError> {
        let title = req.title.trim().to_string();
        if title.is_empty() {
            return Err(EngineError::Validation("title must not be empty".to_string()));
        }

        let questions = normalize_questions(&req.questions);
        if questions.is_empty() {
            return Err(EngineError::Validation(
                "at least one valid question is required".to_string(),
            ));
        }

        let recipient_email = req
            .recipient_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let send_after_days = recipient_email
            .as_ref()
            .map(|_| req.send_after_days.unwrap_or(DEFAULT_DELAY_DAYS).max(MIN_DELAY_DAYS));

        let now = self.cache.now();
        let ttl = if req.scheduled { SCHEDULED_TTL } else { IMMEDIATE_TTL };
        let id = Uuid::new_v4();
        let row = Questionnaire {
            id,
            practitioner_id: practitioner_id.to_string(),
            title,
            questions,
            recipient_email,
            send_after_days,
            scheduled: req.scheduled,
            status: if req.scheduled {
                QuestionnaireStatus::Scheduled
            } else {
                QuestionnaireStatus::Pending
            },
            review_url: req.review_url.filter(|u| !u.trim().is_empty()),
            created_at: now,
            expires_at: now.saturating_add(ttl).expect("SignedDuration never overflows saturating_add"),
            sent_at: None,
            reminder_sent_at: None,
            is_favorite: false,
        };

        self.cache.put(id, row.clone(), ttl);

        // Best-effort mirror. Its failure must not fail the create — the
        // ephemeral copy alone serves the link.
        let store = Arc::clone(&self.store);
        tokio::spawn(mirror(store, row.clone()));

        Ok(Created {
            id,
            link: self.link(id),
            expires_at: row.expires_at,
        })
    }

    /// Fetch a still-fillable questionnaire. Ephemeral presence is
    /// authoritative here: a cache miss is "not found or expired" even if a
    /// durable copy exists.
    pub async fn get(&self, id: Uuid) -> Result<Questionnaire, EngineError> {
        match self.cache.get(id) {
            Some(q) if q.status == QuestionnaireStatus::Completed => {
                Err(EngineError::AlreadyCompleted)
            }
            Some(q) => Ok(q),
            None => Err(self.not_found_kind(id).await),
        }
    }

    /// On a cache miss the durable copy is consulted only to tell "already
    /// completed" apart from "not found" — it is never served as fillable.
    pub(crate) async fn not_found_kind(&self, id: Uuid) -> EngineError {
        match self.store.load_questionnaire(id).await {
            Ok(v) if v.row.status == QuestionnaireStatus::Completed => {
                EngineError::AlreadyCompleted
            }
            Ok(_) | Err(StorageError::NotFound { .. }) => EngineError::NotFound,
            Err(e) => {
                tracing::warn!(questionnaire_id = %id, error = %e, "status lookup failed");
                EngineError::NotFound
            }
        }
    }

    /// Dashboard listing for one practitioner. Response enrichment is
    /// best-effort; a failed lookup leaves the row unenriched.
    pub async fn list(
        &self,
        practitioner_id: &str,
    ) -> Result<Vec<QuestionnaireSummary>, EngineError> {
        let rows = self.store.list_questionnaires().await?;

        let mut summaries = Vec::new();
        for row in rows
            .into_iter()
            .filter(|r| r.practitioner_id == practitioner_id)
        {
            let (has_response, response_viewed) = match self.store.load_response(row.id).await {
                Ok(resp) => (true, resp.viewed_at.is_some()),
                Err(StorageError::NotFound { .. }) => (false, false),
                Err(e) => {
                    tracing::debug!(
                        questionnaire_id = %row.id,
                        error = %e,
                        "response enrichment skipped"
                    );
                    (false, false)
                }
            };
            summaries.push(QuestionnaireSummary {
                id: row.id,
                title: row.title,
                question_count: row.questions.len(),
                status: row.status,
                created_at: row.created_at,
                expires_at: row.expires_at,
                has_response,
                response_viewed,
                is_favorite: row.is_favorite,
            });
        }
        Ok(summaries)
    }

    /// Stamp the response as viewed by its practitioner. First view wins;
    /// later calls are no-ops.
    pub async fn mark_viewed(&self, practitioner_id: &str, id: Uuid) -> Result<(), EngineError> {
        let owned = self
            .store
            .load_questionnaire(id)
            .await
            .map_err(or_not_found)?;
        if owned.row.practitioner_id != practitioner_id {
            return Err(EngineError::Forbidden);
        }

        let mut response = self.store.load_response(id).await.map_err(or_not_found)?;
        if response.viewed_at.is_none() {
            response.viewed_at = Some(self.cache.now());
            self.store.save_response(response).await?;
        }
        Ok(())
    }

    pub async fn set_favorite(
        &self,
        practitioner_id: &str,
        id: Uuid,
        is_favorite: bool,
    ) -> Result<(), EngineError> {
        let owned = self
            .store
            .load_questionnaire(id)
            .await
            .map_err(or_not_found)?;
        if owned.row.practitioner_id != practitioner_id {
            return Err(EngineError::Forbidden);
        }

        let mut row = owned.row;
        row.is_favorite = is_favorite;
        self.store.save_questionnaire(row).await?;
        Ok(())
    }
}

/// Durable mirror of a freshly created questionnaire, tracked by a backup
/// log row that transitions `Processing` → `Completed`/`Failed`.
async fn mirror(store: Arc<dyn RowStore>, row: Questionnaire) {
    let questionnaire_id = row.id;
    let log = |status: BackupStatus, detail: Option<String>| BackupLogEntry {
        questionnaire_id,
        status,
        detail,
        created_at: Timestamp::now(),
    };

    if let Err(e) = store.save_backup_log(log(BackupStatus::Processing, None)).await {
        tracing::warn!(questionnaire_id = %questionnaire_id, error = %e, "backup log write failed");
    }

    match store.save_questionnaire(row).await {
        Ok(()) => {
            if let Err(e) = store.save_backup_log(log(BackupStatus::Completed, None)).await {
                tracing::warn!(questionnaire_id = %questionnaire_id, error = %e, "backup log write failed");
            }
        }
        Err(e) => {
            tracing::warn!(
                questionnaire_id = %questionnaire_id,
                error = %e,
                "durable mirror failed; ephemeral copy remains authoritative"
            );
            if let Err(log_err) = store
                .save_backup_log(log(BackupStatus::Failed, Some(e.to_string())))
                .await
            {
                tracing::warn!(questionnaire_id = %questionnaire_id, error = %log_err, "backup log write failed");
            }
        }
    }
}
