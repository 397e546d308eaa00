//! Delivery scheduler: finds due questionnaires and sends the invitation
//! email, flipping them to `Sent`. Runs on an external daily cadence, or
//! against a single id for operator testing.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use uuid::Uuid;

use relance_core::models::questionnaire::{Questionnaire, QuestionnaireStatus};
use relance_mailer::{templates, EmailMessage};

use crate::error::SweepError;
use crate::{SweepContext, SweepSummary};

pub async fn run(
    ctx: &SweepContext,
    now: Timestamp,
    force_id: Option<Uuid>,
) -> Result<SweepSummary, SweepError> {
    let today = now.to_zoned(TimeZone::UTC).date();
    let rows = ctx.store.list_questionnaires().await?;

    let candidates: Vec<Questionnaire> = rows
        .into_iter()
        .filter(|q| {
            q.status.is_deliverable() && q.recipient_email.is_some() && q.send_after_days.is_some()
        })
        .filter(|q| force_id.is_none_or(|id| q.id == id))
        .collect();

    let mut summary = SweepSummary {
        checked: candidates.len(),
        ..Default::default()
    };

    for q in candidates {
        // Force-send skips the due-date filter, never the status filter.
        if force_id.is_none() && !is_due(&q, today) {
            continue;
        }
        summary.due += 1;
        if summary.due > 1 {
            tokio::time::sleep(ctx.send_pause).await;
        }

        let Some(to) = q.recipient_email.clone() else {
            continue;
        };
        let link = format!("{}/q/{}", ctx.app_url, q.id);
        let email = templates::invitation(&q.title, &link);

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
                    questionnaire_id = %q.id,
                    delivery_id = %delivery_id,
                    "questionnaire delivered"
                );
                let id = q.id;
                let mut row = q;
                row.status = QuestionnaireStatus::Sent;
                row.sent_at = Some(now);
                // Recipient email is retained through the reminder window;
                // the reminder sweep redacts it once that window closes.
                match ctx.store.save_questionnaire(row).await {
                    Ok(()) => summary.sent += 1,
                    Err(e) => summary
                        .record_failure(id, format!("status update failed after send: {e}")),
                }
            }
            Err(e) => summary.record_failure(q.id, e.to_string()),
        }
    }

    Ok(summary)
}

/// Due when `created_at + delay_days <= today`, at date granularity only.
fn is_due(q: &Questionnaire, today: Date) -> bool {
    let Some(days) = q.send_after_days else {
        return false;
    };
    let created = q.created_at.to_zoned(TimeZone::UTC).date();
    created.saturating_add(Span::new().days(days)) <= today
}
