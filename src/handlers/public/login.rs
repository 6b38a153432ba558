// POST /api/sessions - credential login, returns a bearer token

use axum::extract::{Json, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verify credentials and mint a token. Unknown email and wrong password are
/// the same 401; the response never says which one it was.
pub async fn login_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Value> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password required"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, first_name, last_name, role, created_at \
         FROM users WHERE email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.pool)
    .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    let ok = password::verify_password(&payload.password, &user.password_hash).map_err(|e| {
        tracing::error!("Stored credential for {} is unreadable: {}", user.id, e);
        ApiError::internal_server_error("Failed to verify credentials")
    })?;

    if !ok {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let claims = Claims::new(
        user.id,
        user.email.clone(),
        user.role,
        state.config.security.jwt_expiry_days,
    );
    let token = auth::generate_jwt(&claims, &state.config.security.jwt_secret).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "firstName": user.first_name,
            "lastName": user.last_name,
            "role": user.role
        }
    })))
}
