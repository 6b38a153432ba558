// /api/interview-sessions/:id/questions - ordered list and atomic batch insert

use axum::extract::{Extension, Json, Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::Question;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ownership, session_service};
use crate::services::session_service::QuestionSpec;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddQuestionsRequest {
    pub questions: Vec<QuestionSpec>,
}

/// GET - questions in ordinal order; owner or admin
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<Question>> {
    ownership::load_session_authorized(&state.pool, id, &auth_user).await?;
    let questions = session_service::list_questions(&state.pool, id).await?;

    Ok(ApiResponse::success(questions))
}

/// POST - all-or-nothing batch insert; owner only, no admin override
pub async fn post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<AddQuestionsRequest>,
) -> ApiResult<Value> {
    let session = ownership::load_session_owned(&state.pool, id, &auth_user).await?;
    let count = session_service::create_questions(&state.pool, session.id, &payload.questions).await?;

    Ok(ApiResponse::created(json!({ "count": count })))
}
