use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use relance_core::models::question::Question;
use relance_engine::{Created, CreateQuestionnaire, QuestionnaireSummary};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn create_questionnaire(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateQuestionnaire>,
) -> Result<Json<Created>, ApiError> {
    let created = state.engine.create(&user.sub, req).await?;
    Ok(Json(created))
}

pub async fn list_questionnaires(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<QuestionnaireSummary>>, ApiError> {
    let summaries = state.engine.list(&user.sub).await?;
    Ok(Json(summaries))
}

/// Patient-facing shape of a fillable questionnaire. Practitioner identity
/// and recipient fields never leave the server.
#[derive(Serialize)]
pub struct PublicQuestionnaire {
    pub id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
    pub expires_at: jiff::Timestamp,
}

pub async fn get_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicQuestionnaire>, ApiError> {
    let q = state.engine.get(id).await?;
    Ok(Json(PublicQuestionnaire {
        id: q.id,
        title: q.title,
        questions: q.questions,
        expires_at: q.expires_at,
    }))
}

pub async fn mark_viewed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, ApiError> {
    state.engine.mark_viewed(&user.sub, id).await?;
    Ok(Json(()))
}

#[derive(Deserialize)]
pub struct FavoriteRequest {
    pub is_favorite: bool,
}

pub async fn set_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<FavoriteRequest>,
) -> Result<Json<()>, ApiError> {
    state
        .engine
        .set_favorite(&user.sub, id, req.is_favorite)
        .await?;
    Ok(Json(()))
}
