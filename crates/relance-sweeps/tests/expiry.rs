use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use relance_cache::{Clock, ManualClock, TtlCache};
use relance_core::models::question::Question;
use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_core::models::response::SurveyResponse;
use relance_mailer::memory::RecordingMailer;
use relance_storage::memory::MemoryRowStore;
use relance_storage::rows::RowStore;
use relance_sweeps::{expiry, SweepContext};

fn questionnaire(created_at: &str, lifetime_hours: i64) -> Questionnaire {
    let created: Timestamp = created_at.parse().unwrap();
    Questionnaire {
        id: Uuid::new_v4(),
        practitioner_id: "prac-1".to_string(),
        title: "Knee surgery follow-up".to_string(),
        questions: vec![Question::FreeText {
            prompt: "Anything else?".to_string(),
        }],
        recipient_email: None,
        send_after_days: None,
        scheduled: false,
        status: QuestionnaireStatus::Completed,
        review_url: None,
        created_at: created,
        expires_at: created.saturating_add(SignedDuration::from_hours(lifetime_hours)).expect("SignedDuration never overflows saturating_add"),
        sent_at: None,
        reminder_sent_at: None,
        is_favorite: false,
    }
}

#[tokio::test]
async fn expired_rows_are_purged_everywhere_regardless_of_status() {
    let store = Arc::new(MemoryRowStore::new());
    let clock = Arc::new(ManualClock::new(
        "2026-08-01T10:00:00Z".parse::<Timestamp>().unwrap(),
    ));
    let cache = Arc::new(TtlCache::new(clock.clone()));
    let ctx = SweepContext {
        store: store.clone(),
        mailer: Arc::new(RecordingMailer::new()),
        cache: cache.clone(),
        app_url: "https://app.relance.example".to_string(),
        send_pause: Duration::ZERO,
    };

    let dead = questionnaire("2026-08-01T08:00:00Z", 2);
    let alive = questionnaire("2026-08-01T09:30:00Z", 14 * 24);
    let dead_id = dead.id;
    let alive_id = alive.id;

    cache.put(dead_id, dead.clone(), SignedDuration::from_hours(2));
    store.save_questionnaire(dead).await.unwrap();
    store.save_questionnaire(alive).await.unwrap();
    store
        .create_response(SurveyResponse {
            questionnaire_id: dead_id,
            answers: vec![3],
            comment: None,
            average_score: 3.0,
            score_total: 3,
            submitted_at: "2026-08-01T09:00:00Z".parse().unwrap(),
            viewed_at: None,
        })
        .await
        .unwrap();

    let summary = expiry::run(&ctx, clock.now()).await.unwrap();
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.due, 1);
    assert_eq!(summary.sent, 1);

    assert!(store.questionnaire(dead_id).is_none());
    assert!(store.response(dead_id).is_none(), "response dies with its parent");
    assert!(cache.get(dead_id).is_none());
    assert!(store.questionnaire(alive_id).is_some());
}
