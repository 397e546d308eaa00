//! relance-alerts
//!
//! Practitioner-facing alert and notification dispatch. Everything here is
//! best-effort: failures are logged, never surfaced to the request that
//! triggered them. The alert log row is written regardless of email
//! delivery, which makes it an audit trail independent of the provider.

mod dispatch;

pub use dispatch::{send_low_score_alert, send_new_response_notification, LowScoreContext};
