//! In-memory [`RowStore`] with the same conditional-write semantics as S3.
//! Used by tests and local development; never by a deployed environment.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use relance_core::keys;
use relance_core::models::alert::AlertLogEntry;
use relance_core::models::backup::BackupLogEntry;
use relance_core::models::practitioner::Practitioner;
use relance_core::models::questionnaire::Questionnaire;
use relance_core::models::response::SurveyResponse;

use crate::error::StorageError;
use crate::rows::{BoxFuture, RowStore, VersionedQuestionnaire};

#[derive(Default)]
struct Tables {
    questionnaires: HashMap<Uuid, (Questionnaire, u64)>,
    responses: HashMap<Uuid, SurveyResponse>,
    alerts: Vec<AlertLogEntry>,
    practitioners: HashMap<String, Practitioner>,
    backup_logs: HashMap<Uuid, BackupLogEntry>,
}

#[derive(Default)]
pub struct MemoryRowStore {
    tables: Mutex<Tables>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_practitioner(&self, row: Practitioner) {
        self.lock().practitioners.insert(row.id.clone(), row);
    }

    /// Test inspection: every alert row appended so far.
    pub fn alerts(&self) -> Vec<AlertLogEntry> {
        self.lock().alerts.clone()
    }

    /// Test inspection: the stored response row, if any.
    pub fn response(&self, questionnaire_id: Uuid) -> Option<SurveyResponse> {
        self.lock().responses.get(&questionnaire_id).cloned()
    }

    /// Test inspection: the stored questionnaire row, if any.
    pub fn questionnaire(&self, id: Uuid) -> Option<Questionnaire> {
        self.lock().questionnaires.get(&id).map(|(row, _)| row.clone())
    }

    /// Test inspection: the backup log row, if any.
    pub fn backup_log(&self, questionnaire_id: Uuid) -> Option<BackupLogEntry> {
        self.lock().backup_logs.get(&questionnaire_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock poisoned")
    }
}

impl RowStore for MemoryRowStore {
    fn load_questionnaire(
        &self,
        id: Uuid,
    ) -> BoxFuture<'_, Result<VersionedQuestionnaire, StorageError>> {
        Box::pin(async move {
            self.lock()
                .questionnaires
                .get(&id)
                .map(|(row, rev)| VersionedQuestionnaire {
                    row: row.clone(),
                    etag: rev.to_string(),
                })
                .ok_or_else(|| StorageError::NotFound {
                    key: keys::questionnaire(id),
                })
        })
    }

    fn save_questionnaire(&self, row: Questionnaire) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tables = self.lock();
            let rev = tables.questionnaires.get(&row.id).map_or(0, |(_, r)| *r);
            tables.questionnaires.insert(row.id, (row, rev + 1));
            Ok(())
        })
    }

    fn save_questionnaire_if_match(
        &self,
        row: Questionnaire,
        etag: String,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tables = self.lock();
            let key = keys::questionnaire(row.id);
            match tables.questionnaires.get(&row.id) {
                Some((_, rev)) if rev.to_string() == etag => {
                    let rev = *rev;
                    tables.questionnaires.insert(row.id, (row, rev + 1));
                    Ok(())
                }
                Some(_) => Err(StorageError::PreconditionFailed { key }),
                None => Err(StorageError::NotFound { key }),
            }
        })
    }

    fn delete_questionnaire(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().questionnaires.remove(&id);
            Ok(())
        })
    }

    fn list_questionnaires(&self) -> BoxFuture<'_, Result<Vec<Questionnaire>, StorageError>> {
        Box::pin(async move {
            let mut rows: Vec<Questionnaire> = self
                .lock()
                .questionnaires
                .values()
                .map(|(row, _)| row.clone())
                .collect();
            rows.sort_by_key(|r| (r.created_at, r.id));
            Ok(rows)
        })
    }

    fn load_response(
        &self,
        questionnaire_id: Uuid,
    ) -> BoxFuture<'_, Result<SurveyResponse, StorageError>> {
        Box::pin(async move {
            self.lock()
                .responses
                .get(&questionnaire_id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: keys::response(questionnaire_id),
                })
        })
    }

    fn create_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut tables = self.lock();
            let key = keys::response(row.questionnaire_id);
            if tables.responses.contains_key(&row.questionnaire_id) {
                return Err(StorageError::PreconditionFailed { key });
            }
            tables.responses.insert(row.questionnaire_id, row);
            Ok(())
        })
    }

    fn save_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().responses.insert(row.questionnaire_id, row);
            Ok(())
        })
    }

    fn delete_response(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().responses.remove(&questionnaire_id);
            Ok(())
        })
    }

    fn response_exists(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move { Ok(self.lock().responses.contains_key(&questionnaire_id)) })
    }

    fn append_alert(&self, entry: AlertLogEntry) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().alerts.push(entry);
            Ok(())
        })
    }

    fn load_practitioner(&self, id: String) -> BoxFuture<'_, Result<Practitioner, StorageError>> {
        Box::pin(async move {
            self.lock()
                .practitioners
                .get(&id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: keys::practitioner(&id),
                })
        })
    }

    fn save_backup_log(&self, entry: BackupLogEntry) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.lock().backup_logs.insert(entry.questionnaire_id, entry);
            Ok(())
        })
    }
}
