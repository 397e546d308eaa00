use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use uuid::Uuid;

use relance_cache::{ManualClock, TtlCache};
use relance_core::models::question::Question;
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_mailer::memory::RecordingMailer;
use relance_storage::memory::MemoryRowStore;
use relance_storage::rows::RowStore;
use relance_sweeps::{delivery, SweepContext};

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

fn scheduled(created_at: &str, delay_days: i64, recipient: &str) -> Questionnaire {
    let created: Timestamp = created_at.parse().unwrap();
    Questionnaire {
        id: Uuid::new_v4(),
        practitioner_id: "prac-1".to_string(),
        title: "Knee surgery follow-up".to_string(),
        questions: vec![Question::Scale {
            prompt: "How is the pain?".to_string(),
            label_low: "Unbearable".to_string(),
            label_high: "Gone".to_string(),
        }],
        recipient_email: Some(recipient.to_string()),
        send_after_days: Some(delay_days),
        scheduled: true,
        status: QuestionnaireStatus::Scheduled,
        review_url: None,
        created_at: created,
        expires_at: created.saturating_add(jiff::SignedDuration::from_hours(14 * 24)).expect("SignedDuration never overflows saturating_add"),
        sent_at: None,
        reminder_sent_at: None,
        is_favorite: false,
    }
}

fn at(ts: &str) -> Timestamp {
    ts.parse().unwrap()
}

#[tokio::test]
async fn not_due_at_day_four_due_at_day_five() {
    let (store, mailer, ctx) = context();
    let q = scheduled("2026-08-01T10:00:00Z", 5, "patient@example.org");
    let id = q.id;
    store.save_questionnaire(q).await.unwrap();

    let early = delivery::run(&ctx, at("2026-08-05T23:59:00Z"), None).await.unwrap();
    assert_eq!(early.checked, 1);
    assert_eq!(early.due, 0);
    assert!(mailer.sent().is_empty());
    assert_eq!(
        store.questionnaire(id).unwrap().status,
        QuestionnaireStatus::Scheduled
    );

    let on_time = delivery::run(&ctx, at("2026-08-06T00:30:00Z"), None).await.unwrap();
    assert_eq!(on_time.due, 1);
    assert_eq!(on_time.sent, 1);
    assert_eq!(on_time.failed, 0);

    let row = store.questionnaire(id).unwrap();
    assert_eq!(row.status, QuestionnaireStatus::Sent);
    assert_eq!(row.sent_at, Some(at("2026-08-06T00:30:00Z")));
    assert_eq!(
        row.recipient_email.as_deref(),
        Some("patient@example.org"),
        "PII survives the send; the reminder sweep owns redaction"
    );

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains(&format!("https://app.relance.example/q/{id}")));
}

#[tokio::test]
async fn one_failing_send_does_not_block_siblings() {
    let (store, mailer, ctx) = context();
    mailer.fail_sends_to("down@example.org");

    let failing = scheduled("2026-08-01T10:00:00Z", 1, "down@example.org");
    let healthy = scheduled("2026-08-01T11:00:00Z", 1, "patient@example.org");
    let failing_id = failing.id;
    let healthy_id = healthy.id;
    store.save_questionnaire(failing).await.unwrap();
    store.save_questionnaire(healthy).await.unwrap();

    let summary = delivery::run(&ctx, at("2026-08-02T12:00:00Z"), None).await.unwrap();
    assert_eq!(summary.due, 2);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].questionnaire_id, failing_id);

    // Failed item keeps its pre-send status so the next sweep retries it.
    assert_eq!(
        store.questionnaire(failing_id).unwrap().status,
        QuestionnaireStatus::Scheduled
    );
    assert_eq!(
        store.questionnaire(healthy_id).unwrap().status,
        QuestionnaireStatus::Sent
    );
}

#[tokio::test]
async fn force_send_bypasses_the_due_date_but_not_the_status() {
    let (store, mailer, ctx) = context();
    let not_yet_due = scheduled("2026-08-01T10:00:00Z", 14, "patient@example.org");
    let id = not_yet_due.id;
    store.save_questionnaire(not_yet_due).await.unwrap();

    let summary = delivery::run(&ctx, at("2026-08-01T10:05:00Z"), Some(id)).await.unwrap();
    assert_eq!(summary.sent, 1);
    assert_eq!(mailer.sent().len(), 1);

    // Already sent: a second forced run finds no deliverable candidate.
    let again = delivery::run(&ctx, at("2026-08-01T10:10:00Z"), Some(id)).await.unwrap();
    assert_eq!(again.checked, 0);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn rows_without_recipient_or_delay_are_not_candidates() {
    let (store, mailer, ctx) = context();

    let mut no_recipient = scheduled("2026-08-01T10:00:00Z", 1, "patient@example.org");
    no_recipient.recipient_email = None;
    let mut no_delay = scheduled("2026-08-01T10:00:00Z", 1, "other@example.org");
    no_delay.send_after_days = None;
    store.save_questionnaire(no_recipient).await.unwrap();
    store.save_questionnaire(no_delay).await.unwrap();

    let summary = delivery::run(&ctx, at("2026-08-20T10:00:00Z"), None).await.unwrap();
    assert_eq!(summary.checked, 0);
    assert!(mailer.sent().is_empty());
}
