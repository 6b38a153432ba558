// /api/interview-sessions/:id/summary - read-only aggregate projection

use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ownership, session_service};
use crate::state::AppState;

/// GET - candidate fields plus question/answer/feedback counts; owner or admin
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<session_service::SessionSummary> {
    let session = ownership::load_session_authorized(&state.pool, id, &auth_user).await?;
    let summary = session_service::get_summary(&state.pool, session).await?;

    Ok(ApiResponse::success(summary))
}
