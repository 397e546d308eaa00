use axum::extract::State;
use axum::Json;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use relance_sweeps::{delivery, expiry, reminder, SweepSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// Operator body for the delivery and reminder sweeps. `force_send`
/// targets a single questionnaire and skips the due-date/age filter.
#[derive(Debug, Default, Deserialize)]
pub struct SweepRequest {
    #[serde(default)]
    pub force_send: Option<Uuid>,
}

#[derive(Serialize)]
pub struct SweepReport {
    pub message: String,
    #[serde(flatten)]
    pub summary: SweepSummary,
}

pub async fn run_delivery(
    State(state): State<AppState>,
    body: Option<Json<SweepRequest>>,
) -> Result<Json<SweepReport>, ApiError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let summary = delivery::run(&state.sweeps, Timestamp::now(), req.force_send).await?;
    Ok(Json(SweepReport {
        message: "delivery sweep finished".to_string(),
        summary,
    }))
}

pub async fn run_reminder(
    State(state): State<AppState>,
    body: Option<Json<SweepRequest>>,
) -> Result<Json<SweepReport>, ApiError> {
    let req = body.map(|Json(b)| b).unwrap_or_default();
    let summary = reminder::run(&state.sweeps, Timestamp::now(), req.force_send).await?;
    Ok(Json(SweepReport {
        message: "reminder sweep finished".to_string(),
        summary,
    }))
}

pub async fn run_expiry(State(state): State<AppState>) -> Result<Json<SweepReport>, ApiError> {
    let summary = expiry::run(&state.sweeps, Timestamp::now()).await?;
    Ok(Json(SweepReport {
        message: "expiry sweep finished".to_string(),
        summary,
    }))
}
