use jiff::Timestamp;
use uuid::Uuid;

use relance_core::models::question::Question;
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_core::models::response::SurveyResponse;
use relance_storage::error::StorageError;
use relance_storage::memory::MemoryRowStore;
use relance_storage::rows::RowStore;

fn questionnaire(id: Uuid) -> Questionnaire {
    let now: Timestamp = "2026-08-06T09:00:00Z".parse().unwrap();
    Questionnaire {
        id,
        practitioner_id: "prac-1".to_string(),
        title: "Post-op follow-up".to_string(),
        questions: vec![Question::Scale {
            prompt: "How are you feeling?".to_string(),
            label_low: "Bad".to_string(),
            label_high: "Great".to_string(),
        }],
        recipient_email: Some("patient@example.org".to_string()),
        send_after_days: Some(1),
        scheduled: true,
        status: QuestionnaireStatus::Scheduled,
        review_url: None,
        created_at: now,
        expires_at: now,
        sent_at: None,
        reminder_sent_at: None,
        is_favorite: false,
    }
}

fn response(id: Uuid) -> SurveyResponse {
    SurveyResponse {
        questionnaire_id: id,
        answers: vec![4, 5],
        comment: None,
        average_score: 4.5,
        score_total: 5,
        submitted_at: "2026-08-06T10:00:00Z".parse().unwrap(),
        viewed_at: None,
    }
}

#[tokio::test]
async fn conditional_save_rejects_stale_etag() {
    let store = MemoryRowStore::new();
    let id = Uuid::new_v4();
    store.save_questionnaire(questionnaire(id)).await.unwrap();

    let loaded = store.load_questionnaire(id).await.unwrap();

    // A concurrent writer bumps the revision.
    store.save_questionnaire(questionnaire(id)).await.unwrap();

    let err = store
        .save_questionnaire_if_match(loaded.row, loaded.etag)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn conditional_save_with_fresh_etag_succeeds() {
    let store = MemoryRowStore::new();
    let id = Uuid::new_v4();
    store.save_questionnaire(questionnaire(id)).await.unwrap();

    let loaded = store.load_questionnaire(id).await.unwrap();
    let mut row = loaded.row;
    row.status = QuestionnaireStatus::Completed;
    store
        .save_questionnaire_if_match(row, loaded.etag)
        .await
        .unwrap();

    let reloaded = store.load_questionnaire(id).await.unwrap();
    assert_eq!(reloaded.row.status, QuestionnaireStatus::Completed);
}

#[tokio::test]
async fn create_response_is_first_writer_wins() {
    let store = MemoryRowStore::new();
    let id = Uuid::new_v4();

    store.create_response(response(id)).await.unwrap();
    let err = store.create_response(response(id)).await.unwrap_err();
    assert!(matches!(err, StorageError::PreconditionFailed { .. }));

    assert!(store.response_exists(id).await.unwrap());
}

#[tokio::test]
async fn deletes_are_idempotent() {
    let store = MemoryRowStore::new();
    let id = Uuid::new_v4();

    store.delete_questionnaire(id).await.unwrap();
    store.delete_response(id).await.unwrap();
    assert!(!store.response_exists(id).await.unwrap());
}
