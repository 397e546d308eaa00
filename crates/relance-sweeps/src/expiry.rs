//! Expiry sweep: hard-deletes questionnaires (and their responses) whose
//! expiry passed, regardless of status, and purges the ephemeral copy.

use jiff::Timestamp;

use crate::error::SweepError;
use crate::{SweepContext, SweepSummary};

pub async fn run(ctx: &SweepContext, now: Timestamp) -> Result<SweepSummary, SweepError> {
    let rows = ctx.store.list_questionnaires().await?;

    let mut summary = SweepSummary {
        checked: rows.len(),
        ..Default::default()
    };

    for q in rows.into_iter().filter(|q| q.expires_at <= now) {
        summary.due += 1;

        // Response first: a questionnaire without its response is cleaned
        // up by the next run, the reverse would orphan the response.
        if let Err(e) = ctx.store.delete_response(q.id).await {
            summary.record_failure(q.id, format!("response delete failed: {e}"));
            continue;
        }
        match ctx.store.delete_questionnaire(q.id).await {
            Ok(()) => {
                ctx.cache.remove(q.id);
                summary.sent += 1;
                tracing::info!(questionnaire_id = %q.id, "expired questionnaire purged");
            }
            Err(e) => summary.record_failure(q.id, e.to_string()),
        }
    }

    Ok(summary)
}
