use jiff::Timestamp;
use uuid::Uuid;

use relance_core::models::alert::AlertLogEntry;
use relance_mailer::{templates, EmailMessage, Mailer};
use relance_storage::error::StorageError;
use relance_storage::rows::RowStore;

/// Everything the low-score path needs from the submission that triggered
/// it.
#[derive(Debug, Clone)]
pub struct LowScoreContext {
    pub questionnaire_id: Uuid,
    pub practitioner_id: String,
    /// Patient email if not yet redacted; recorded in the log row.
    pub patient_email: Option<String>,
    pub title: String,
    pub score_total: u8,
    pub average_score: f64,
}

/// Send the critical low-score email and append the alert log row.
///
/// The log row is written whether or not the email went out; `alert_sent`
/// records the actual delivery outcome. A missing practitioner profile or a
/// provider failure is logged and swallowed.
pub async fn send_low_score_alert(store: &dyn RowStore, mailer: &dyn Mailer, ctx: LowScoreContext) {
    let alert_sent = match store.load_practitioner(ctx.practitioner_id.clone()).await {
        Ok(practitioner) => {
            let email = templates::low_score_alert(
                &practitioner.full_name,
                &ctx.title,
                ctx.score_total,
                ctx.average_score,
            );
            match mailer
                .send(EmailMessage {
                    to: practitioner.email,
                    subject: email.subject,
                    html: email.html,
                    text: email.text,
                })
                .await
            {
                Ok(delivery_id) => {
                    tracing::info!(
                        questionnaire_id = %ctx.questionnaire_id,
                        delivery_id = %delivery_id,
                        "low-score alert sent"
                    );
                    true
                }
                Err(e) => {
                    tracing::warn!(
                        questionnaire_id = %ctx.questionnaire_id,
                        error = %e,
                        "low-score alert email failed"
                    );
                    false
                }
            }
        }
        Err(StorageError::NotFound { .. }) => {
            tracing::warn!(
                practitioner_id = %ctx.practitioner_id,
                "no practitioner profile for low-score alert"
            );
            false
        }
        Err(e) => {
            tracing::warn!(
                practitioner_id = %ctx.practitioner_id,
                error = %e,
                "practitioner lookup failed for low-score alert"
            );
            false
        }
    };

    let entry = AlertLogEntry {
        id: Uuid::new_v4(),
        questionnaire_id: ctx.questionnaire_id,
        practitioner_id: ctx.practitioner_id,
        patient_email: ctx.patient_email,
        score_total: ctx.score_total,
        average_score: ctx.average_score,
        alert_sent,
        created_at: Timestamp::now(),
    };
    if let Err(e) = store.append_alert(entry).await {
        tracing::warn!(error = %e, "alert log write failed");
    }
}

/// Notify the owning practitioner that a new response arrived, regardless
/// of score. No log row — this is routine traffic.
pub async fn send_new_response_notification(
    store: &dyn RowStore,
    mailer: &dyn Mailer,
    practitioner_id: String,
    title: String,
) {
    let practitioner = match store.load_practitioner(practitioner_id.clone()).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(
                practitioner_id = %practitioner_id,
                error = %e,
                "practitioner lookup failed for response notification"
            );
            return;
        }
    };

    let email = templates::new_response(&practitioner.full_name, &title);
    if let Err(e) = mailer
        .send(EmailMessage {
            to: practitioner.email,
            subject: email.subject,
            html: email.html,
            text: email.text,
        })
        .await
    {
        tracing::warn!(
            practitioner_id = %practitioner_id,
            error = %e,
            "response notification email failed"
        );
    }
}
