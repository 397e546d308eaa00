//! Full lifecycle: create → delivery sweep → patient submission → scoring →
//! completion, with the reminder sweep standing down once the response is
//! in.

use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use serde_json::json;

use relance_cache::{Clock, ManualClock, TtlCache};
use relance_core::models::practitioner::{Practitioner, Role};
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_engine::{CreateQuestionnaire, Engine, EngineConfig, RawSubmission};
use relance_mailer::memory::RecordingMailer;
use relance_storage::memory::MemoryRowStore;
use relance_sweeps::{delivery, reminder, SweepContext};

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn questionnaire_travels_from_creation_to_completion() {
    let clock = Arc::new(ManualClock::new(
        "2026-08-06T09:00:00Z".parse::<Timestamp>().unwrap(),
    ));
    let cache = Arc::new(TtlCache::<Questionnaire>::new(clock.clone()));
    let store = Arc::new(MemoryRowStore::new());
    store.insert_practitioner(Practitioner {
        id: "prac-1".to_string(),
        email: "dr.martin@clinic.example".to_string(),
        full_name: "Dr. Martin".to_string(),
        role: Role::Practitioner,
        region: None,
    });
    let mailer = Arc::new(RecordingMailer::new());

    let engine = Engine::new(
        cache.clone(),
        store.clone(),
        mailer.clone(),
        EngineConfig {
            app_url: "https://app.relance.example".to_string(),
        },
    );
    let ctx = SweepContext {
        store: store.clone(),
        mailer: mailer.clone(),
        cache: cache.clone(),
        app_url: "https://app.relance.example".to_string(),
        send_pause: Duration::ZERO,
    };

    // Day 0: the practitioner schedules a three-question follow-up.
    let created = engine
        .create(
            "prac-1",
            CreateQuestionnaire {
                title: "Knee surgery follow-up".to_string(),
                questions: vec![
                    json!("How is the pain?"),
                    json!("How was the care team?"),
                    json!("Would you recommend us?"),
                ],
                scheduled: true,
                send_after_days: Some(1),
                recipient_email: Some("patient@example.org".to_string()),
                review_url: Some("https://reviews.example/dr-martin".to_string()),
            },
        )
        .await
        .unwrap();
    settle().await;

    // Day 0: nothing is due yet.
    let early = delivery::run(&ctx, clock.now(), None).await.unwrap();
    assert_eq!(early.due, 0);

    // Day 1: the sweep delivers the invitation.
    clock.advance(SignedDuration::from_hours(24));
    let swept = delivery::run(&ctx, clock.now(), None).await.unwrap();
    assert_eq!(swept.sent, 1);
    let invitation = &mailer.sent()[0];
    assert_eq!(invitation.to, "patient@example.org");
    assert!(invitation.html.contains(&created.link));
    assert_eq!(
        store.questionnaire(created.id).unwrap().status,
        QuestionnaireStatus::Sent
    );

    // The patient follows the link and submits a happy answer set.
    let outcome = engine
        .submit(
            created.id,
            RawSubmission {
                answers: json!([5, 5, 4]),
                comment: Some("All good, thanks!".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        outcome.redirect_url.as_deref(),
        Some("https://reviews.example/dr-martin"),
        "score 4.67 qualifies for the review redirect"
    );
    settle().await;

    let response = store.response(created.id).unwrap();
    assert!((response.average_score - 14.0 / 3.0).abs() < 1e-9);
    assert_eq!(response.score_total, 5);
    assert_eq!(response.comment.as_deref(), Some("All good, thanks!"));

    assert_eq!(
        store.questionnaire(created.id).unwrap().status,
        QuestionnaireStatus::Completed
    );
    assert!(store.alerts().is_empty(), "no alert for a high score");

    // Day 5: the reminder sweep finds the response and stands down,
    // purging the recipient email instead.
    clock.advance(SignedDuration::from_hours(4 * 24));
    let reminded = reminder::run(&ctx, clock.now(), None).await.unwrap();
    assert_eq!(reminded.due, 0);
    assert_eq!(
        store.questionnaire(created.id).unwrap().recipient_email,
        None
    );

    // Invitation + new-response notification; never a reminder.
    assert_eq!(mailer.sent().len(), 2);
}
