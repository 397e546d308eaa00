//! relance-sweeps
//!
//! Externally triggered batch jobs: delivery of due questionnaires, the
//! one-shot patient reminder, and expiry cleanup. Each sweep is idempotent
//! by construction — status checks and stamps make re-running a killed
//! batch safe — and one item's failure never aborts its siblings.

pub mod delivery;
pub mod error;
pub mod expiry;
pub mod reminder;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use relance_cache::TtlCache;
use relance_core::models::questionnaire::Questionnaire;
use relance_mailer::Mailer;
use relance_storage::rows::RowStore;

/// Shared handles every sweep runs against.
pub struct SweepContext {
    pub store: Arc<dyn RowStore>,
    pub mailer: Arc<dyn Mailer>,
    pub cache: Arc<TtlCache<Questionnaire>>,
    /// Base URL for patient links, without a trailing slash.
    pub app_url: String,
    /// Fixed pause between outbound sends, respecting the email provider's
    /// throughput limit.
    pub send_pause: Duration,
}

/// Outcome of one sweep invocation, returned verbatim by the operator
/// endpoints.
#[derive(Debug, Default, Serialize)]
pub struct SweepSummary {
    /// Candidates examined.
    pub checked: usize,
    /// Candidates that were actually due for action.
    pub due: usize,
    /// Items acted on successfully (emails sent, or rows deleted for the
    /// expiry sweep).
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<SweepItemError>,
}

#[derive(Debug, Serialize)]
pub struct SweepItemError {
    pub questionnaire_id: Uuid,
    pub detail: String,
}

impl SweepSummary {
    fn record_failure(&mut self, questionnaire_id: Uuid, detail: String) {
        tracing::warn!(%questionnaire_id, detail = %detail, "sweep item failed");
        self.failed += 1;
        self.errors.push(SweepItemError {
            questionnaire_id,
            detail,
        });
    }
}
