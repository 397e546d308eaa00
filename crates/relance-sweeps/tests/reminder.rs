use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use uuid::Uuid;

use relance_cache::{ManualClock, TtlCache};
use relance_core::models::question::Question;
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_core::models::response::SurveyResponse;
use relance_mailer::memory::RecordingMailer;
use relance_storage::memory::MemoryRowStore;
use relance_storage::rows::RowStore;
use relance_sweeps::{reminder, SweepContext};

fn context() -> (Arc<MemoryRowStore>, Arc<RecordingMailer>, SweepContext) {
    let store = Arc::new(MemoryRowStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let clock = Arc::new(ManualClock::new(
        "2026-08-01T10:00:00Z".parse::<Timestamp>().unwrap(),
    ));
    let ctx = SweepContext {
        store: store.clone(),
        mailer: mailer.clone(),
        cache: Arc::new(TtlCache::new(clock)),
        app_url: "https://app.relance.example".to_string(),
        send_pause: Duration::ZERO,
    };
    (store, mailer, ctx)
}

fn sent_questionnaire(sent_at: &str) -> Questionnaire {
    let sent: Timestamp = sent_at.parse().unwrap();
    let created = sent.saturating_add(jiff::SignedDuration::from_hours(-24)).expect("SignedDuration never overflows saturating_add");
    Questionnaire {
        id: Uuid::new_v4(),
        practitioner_id: "prac-1".to_string(),
        title: "Knee surgery follow-up".to_string(),
        questions: vec![Question::Scale {
            prompt: "How is the pain?".to_string(),
            label_low: "Unbearable".to_string(),
            label_high: "Gone".to_string(),
        }],
        recipient_email: Some("patient@example.org".to_string()),
        send_after_days: Some(1),
        scheduled: true,
        status: QuestionnaireStatus::Sent,
        review_url: None,
        created_at: created,
        expires_at: created.saturating_add(jiff::SignedDuration::from_hours(14 * 24)).expect("SignedDuration never overflows saturating_add"),
        sent_at: Some(sent),
        reminder_sent_at: None,
        is_favorite: false,
    }
}

fn at(ts: &str) -> Timestamp {
    ts.parse().unwrap()
}

#[tokio::test]
async fn reminder_goes_out_exactly_once() {
    let (store, mailer, ctx) = context();
    let q = sent_questionnaire("2026-08-01T10:00:00Z");
    let id = q.id;
    store.save_questionnaire(q).await.unwrap();

    let now = at("2026-08-05T10:00:00Z");
    let first = reminder::run(&ctx, now, None).await.unwrap();
    assert_eq!(first.due, 1);
    assert_eq!(first.sent, 1);

    let row = store.questionnaire(id).unwrap();
    assert_eq!(row.reminder_sent_at, Some(now));
    assert_eq!(row.recipient_email, None, "PII purged with the reminder");

    // Second run: the stamp makes the item invisible to the sweep.
    let second = reminder::run(&ctx, at("2026-08-06T10:00:00Z"), None).await.unwrap();
    assert_eq!(second.checked, 0);
    assert_eq!(mailer.sent().len(), 1, "exactly one reminder email ever");
}

#[tokio::test]
async fn too_recent_sends_are_left_alone() {
    let (store, mailer, ctx) = context();
    store
        .save_questionnaire(sent_questionnaire("2026-08-01T10:00:00Z"))
        .await
        .unwrap();

    let summary = reminder::run(&ctx, at("2026-08-03T10:00:00Z"), None).await.unwrap();
    assert_eq!(summary.checked, 0);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn answered_patient_is_redacted_instead_of_reminded() {
    let (store, mailer, ctx) = context();
    let q = sent_questionnaire("2026-08-01T10:00:00Z");
    let id = q.id;
    store.save_questionnaire(q).await.unwrap();
    store
        .create_response(SurveyResponse {
            questionnaire_id: id,
            answers: vec![4],
            comment: None,
            average_score: 4.0,
            score_total: 4,
            submitted_at: at("2026-08-02T10:00:00Z"),
            viewed_at: None,
        })
        .await
        .unwrap();

    let summary = reminder::run(&ctx, at("2026-08-05T10:00:00Z"), None).await.unwrap();
    assert_eq!(summary.due, 0);
    assert!(mailer.sent().is_empty(), "no reminder for an answered questionnaire");

    let row = store.questionnaire(id).unwrap();
    assert_eq!(row.recipient_email, None, "window closed, PII purged");
    assert_eq!(row.reminder_sent_at, None);
}

#[tokio::test]
async fn failed_reminder_send_is_retried_by_the_next_run() {
    let (store, mailer, ctx) = context();
    mailer.fail_sends_to("patient@example.org");
    let q = sent_questionnaire("2026-08-01T10:00:00Z");
    let id = q.id;
    store.save_questionnaire(q).await.unwrap();

    let summary = reminder::run(&ctx, at("2026-08-05T10:00:00Z"), None).await.unwrap();
    assert_eq!(summary.failed, 1);

    let row = store.questionnaire(id).unwrap();
    assert_eq!(row.reminder_sent_at, None, "no stamp without a delivery");
    assert!(row.recipient_email.is_some(), "PII kept so the retry can send");
}

#[tokio::test]
async fn force_send_skips_the_age_window_but_not_the_stamp() {
    let (store, mailer, ctx) = context();
    let q = sent_questionnaire("2026-08-01T10:00:00Z");
    let id = q.id;
    store.save_questionnaire(q).await.unwrap();

    // One hour after the send — far inside the age window.
    let summary = reminder::run(&ctx, at("2026-08-01T11:00:00Z"), Some(id)).await.unwrap();
    assert_eq!(summary.sent, 1);
    assert_eq!(mailer.sent().len(), 1);

    // The stamp still guards a second forced run.
    let again = reminder::run(&ctx, at("2026-08-01T12:00:00Z"), Some(id)).await.unwrap();
    assert_eq!(again.checked, 0);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn already_redacted_rows_are_not_candidates() {
    let (store, mailer, ctx) = context();
    let mut q = sent_questionnaire("2026-08-01T10:00:00Z");
    q.recipient_email = None;
    store.save_questionnaire(q).await.unwrap();

    let summary = reminder::run(&ctx, at("2026-08-05T10:00:00Z"), None).await.unwrap();
    assert_eq!(summary.checked, 0);
    assert!(mailer.sent().is_empty());
}
