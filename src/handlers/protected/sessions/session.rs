// /api/interview-sessions - create, list and detail

use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::InterviewSession;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ownership, session_service};
use crate::state::AppState;

/// POST /api/interview-sessions - create a session owned by the caller.
/// Ownership is self-referential: the candidate id comes from the token,
/// never from the request body.
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Value> {
    let session = session_service::create_session(&state.pool, auth_user.id).await?;

    Ok(ApiResponse::created(json!({ "id": session.id })))
}

/// GET /api/interview-sessions - the caller's sessions, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<InterviewSession>> {
    let sessions = session_service::list_by_candidate(&state.pool, auth_user.id).await?;

    Ok(ApiResponse::success(sessions))
}

/// GET /api/interview-sessions/:id - full detail; owner or admin
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<session_service::SessionDetail> {
    let session = ownership::load_session_authorized(&state.pool, id, &auth_user).await?;
    let detail = session_service::get_detail(&state.pool, session).await?;

    Ok(ApiResponse::success(detail))
}
