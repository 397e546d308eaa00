//! Reminder sweep: re-notifies patients who have not answered within the
//! window, exactly once, and redacts recipient PII once the reminder window
//! has definitively closed.

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_mailer::{templates, EmailMessage};

use crate::error::SweepError;
use crate::{SweepContext, SweepSummary};

/// How long after the send a silent patient gets their single reminder.
const REMINDER_AFTER: SignedDuration = SignedDuration::from_hours(3 * 24);

pub async fn run(
    ctx: &SweepContext,
    now: Timestamp,
    force_id: Option<Uuid>,
) -> Result<SweepSummary, SweepError> {
    let rows = ctx.store.list_questionnaires().await?;

    let candidates: Vec<Questionnaire> = rows
        .into_iter()
        .filter(|q| {
            q.status == QuestionnaireStatus::Sent
                && q.reminder_sent_at.is_none()
                && q.recipient_email.is_some()
        })
        // Force skips the age window, never the status/stamp checks.
        .filter(|q| match force_id {
            Some(id) => q.id == id,
            None => q
                .sent_at
                .is_some_and(|sent| now.duration_since(sent) >= REMINDER_AFTER),
        })
        .collect();

    let mut summary = SweepSummary {
        checked: candidates.len(),
        ..Default::default()
    };

    for q in candidates {
        let id = q.id;
        match ctx.store.response_exists(id).await {
            Ok(true) => {
                // Answered in the meantime: no reminder needed, and the
                // window is closed — purge the PII now.
                let mut row = q;
                row.recipient_email = None;
                if let Err(e) = ctx.store.save_questionnaire(row).await {
                    summary.record_failure(id, format!("redaction failed: {e}"));
                }
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                summary.record_failure(id, e.to_string());
                continue;
            }
        }

        summary.due += 1;
        if summary.due > 1 {
            tokio::time::sleep(ctx.send_pause).await;
        }

        let Some(to) = q.recipient_email.clone() else {
            continue;
        };
        let link = format!("{}/q/{}", ctx.app_url, id);
        let email = templates::reminder(&q.title, &link);

        match ctx
            .mailer
            .send(EmailMessage {
                to,
                subject: email.subject,
                html: email.html,
                text: email.text,
            })
            .await
        {
            Ok(delivery_id) => {
                tracing::info!(
                    questionnaire_id = %id,
                    delivery_id = %delivery_id,
                    "reminder sent"
                );
                let mut row = q;
                // The stamp guarantees at most one reminder regardless of
                // how many times this sweep runs; the window is closed, so
                // the PII goes with it.
                row.reminder_sent_at = Some(now);
                row.recipient_email = None;
                match ctx.store.save_questionnaire(row).await {
                    Ok(()) => summary.sent += 1,
                    Err(e) => summary
                        .record_failure(id, format!("reminder stamp failed after send: {e}")),
                }
            }
            Err(e) => summary.record_failure(id, e.to_string()),
        }
    }

    Ok(summary)
}
