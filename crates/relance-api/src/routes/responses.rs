use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use relance_engine::{RawSubmission, SubmissionOutcome};

use crate::error::ApiError;
use crate::state::AppState;

/// Unauthenticated patient submission. Validation failures are 400s with a
/// human-readable message; anything deeper stays a generic 500.
pub async fn submit_response(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(raw): Json<RawSubmission>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    let outcome = state.engine.submit(id, raw).await?;
    Ok(Json(outcome))
}
