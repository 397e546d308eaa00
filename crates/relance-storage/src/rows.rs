use std::future::Future;
use std::pin::Pin;

use aws_sdk_s3::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use relance_core::keys;
use relance_core::models::alert::AlertLogEntry;
use relance_core::models::backup::BackupLogEntry;
use relance_core::models::practitioner::Practitioner;
use relance_core::models::questionnaire::Questionnaire;
use relance_core::models::response::SurveyResponse;

use crate::error::StorageError;
use crate::objects;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A questionnaire row paired with the version tag its next conditional
/// write must present.
#[derive(Debug, Clone)]
pub struct VersionedQuestionnaire {
    pub row: Questionnaire,
    pub etag: String,
}

/// Typed row operations over durable storage.
///
/// The engine and the sweeps are written against this seam; production uses
/// [`S3RowStore`], tests use [`crate::memory::MemoryRowStore`].
pub trait RowStore: Send + Sync {
    fn load_questionnaire(
        &self,
        id: Uuid,
    ) -> BoxFuture<'_, Result<VersionedQuestionnaire, StorageError>>;

    fn save_questionnaire(&self, row: Questionnaire) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Conditional write: fails with `PreconditionFailed` if the row changed
    /// since `etag` was read.
    fn save_questionnaire_if_match(
        &self,
        row: Questionnaire,
        etag: String,
    ) -> BoxFuture<'_, Result<(), StorageError>>;

    fn delete_questionnaire(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>>;

    fn list_questionnaires(&self) -> BoxFuture<'_, Result<Vec<Questionnaire>, StorageError>>;

    fn load_response(
        &self,
        questionnaire_id: Uuid,
    ) -> BoxFuture<'_, Result<SurveyResponse, StorageError>>;

    /// Conditional create: fails with `PreconditionFailed` if a response row
    /// already exists for this questionnaire. This is what makes "exactly
    /// one response per questionnaire" hold under concurrent submissions.
    fn create_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Unconditional overwrite, used to stamp the viewed flag.
    fn save_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>>;

    fn delete_response(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<(), StorageError>>;

    fn response_exists(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<bool, StorageError>>;

    fn append_alert(&self, entry: AlertLogEntry) -> BoxFuture<'_, Result<(), StorageError>>;

    fn load_practitioner(&self, id: String) -> BoxFuture<'_, Result<Practitioner, StorageError>>;

    fn save_backup_log(&self, entry: BackupLogEntry) -> BoxFuture<'_, Result<(), StorageError>>;
}

/// Production [`RowStore`] backed by JSON objects in an S3 bucket.
pub struct S3RowStore {
    client: Client,
    bucket: String,
}

impl S3RowStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<(T, String), StorageError> {
        let output = objects::get_object(&self.client, &self.bucket, key).await?;
        let value: T = serde_json::from_slice(&output.body)?;
        Ok((value, output.etag.unwrap_or_default()))
    }

    async fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let body = serde_json::to_vec(value)?;
        objects::put_object(&self.client, &self.bucket, key, body).await?;
        Ok(())
    }
}

impl RowStore for S3RowStore {
    fn load_questionnaire(
        &self,
        id: Uuid,
    ) -> BoxFuture<'_, Result<VersionedQuestionnaire, StorageError>> {
        Box::pin(async move {
            let (row, etag) = self.load_json(&keys::questionnaire(id)).await?;
            Ok(VersionedQuestionnaire { row, etag })
        })
    }

    fn save_questionnaire(&self, row: Questionnaire) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.save_json(&keys::questionnaire(row.id), &row).await })
    }

    fn save_questionnaire_if_match(
        &self,
        row: Questionnaire,
        etag: String,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::questionnaire(row.id);
            let body = serde_json::to_vec(&row)?;
            objects::put_object_if_match(&self.client, &self.bucket, &key, body, &etag).await?;
            Ok(())
        })
    }

    fn delete_questionnaire(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            objects::delete_object(&self.client, &self.bucket, &keys::questionnaire(id)).await
        })
    }

    fn list_questionnaires(&self) -> BoxFuture<'_, Result<Vec<Questionnaire>, StorageError>> {
        Box::pin(async move {
            let prefix = keys::QUESTIONNAIRES_PREFIX;
            let object_keys = objects::list_objects(&self.client, &self.bucket, prefix).await?;

            let mut rows = Vec::with_capacity(object_keys.len());
            for key in &object_keys {
                let (row, _) = self.load_json::<Questionnaire>(key).await?;
                rows.push(row);
            }
            Ok(rows)
        })
    }

    fn load_response(
        &self,
        questionnaire_id: Uuid,
    ) -> BoxFuture<'_, Result<SurveyResponse, StorageError>> {
        Box::pin(async move {
            let (row, _) = self.load_json(&keys::response(questionnaire_id)).await?;
            Ok(row)
        })
    }

    fn create_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let key = keys::response(row.questionnaire_id);
            let body = serde_json::to_vec(&row)?;
            objects::put_object_if_absent(&self.client, &self.bucket, &key, body).await?;
            Ok(())
        })
    }

    fn save_response(&self, row: SurveyResponse) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.save_json(&keys::response(row.questionnaire_id), &row).await })
    }

    fn delete_response(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            objects::delete_object(&self.client, &self.bucket, &keys::response(questionnaire_id))
                .await
        })
    }

    fn response_exists(&self, questionnaire_id: Uuid) -> BoxFuture<'_, Result<bool, StorageError>> {
        Box::pin(async move {
            match objects::get_object(&self.client, &self.bucket, &keys::response(questionnaire_id))
                .await
            {
                Ok(_) => Ok(true),
                Err(StorageError::NotFound { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }

    fn append_alert(&self, entry: AlertLogEntry) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move { self.save_json(&keys::alert(entry.id), &entry).await })
    }

    fn load_practitioner(&self, id: String) -> BoxFuture<'_, Result<Practitioner, StorageError>> {
        Box::pin(async move {
            let (row, _) = self.load_json(&keys::practitioner(&id)).await?;
            Ok(row)
        })
    }

    fn save_backup_log(&self, entry: BackupLogEntry) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.save_json(&keys::backup_log(entry.questionnaire_id), &entry)
                .await
        })
    }
}
