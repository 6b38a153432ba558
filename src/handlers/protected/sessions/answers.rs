// /api/interview-sessions/:id/answers - record one answer

use axum::extract::{Extension, Json, Path, State};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ownership, session_service};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAnswerRequest {
    pub question_id: Uuid,
    pub transcript: String,
    pub ai_json: Option<Value>,
}

/// POST - owner only. The question must belong to this session; a question
/// under a different session is rejected as an invalid reference even though
/// both ids exist. Repeated answers to the same question are allowed.
pub async fn post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<AddAnswerRequest>,
) -> ApiResult<Value> {
    if payload.transcript.is_empty() {
        return Err(ApiError::validation_error("transcript must not be empty", None));
    }

    let session = ownership::load_session_owned(&state.pool, id, &auth_user).await?;
    let answer = session_service::create_answer(
        &state.pool,
        session.id,
        payload.question_id,
        payload.transcript,
        payload.ai_json,
    )
    .await?;

    Ok(ApiResponse::created(json!({ "id": answer.id })))
}
