// POST /api/users - account signup

use axum::extract::{Json, State};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Only institutional accounts may sign up.
const INSTITUTIONAL_DOMAIN: &str = "@csub.edu";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

/// Create an account. Returns `{id}` on success; a duplicate email is a 409.
/// The stored credential is an argon2 hash, never the plaintext.
pub async fn user_post(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Value> {
    validate_signup(&payload)?;

    let password_hash = password::hash_password(&payload.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create account")
    })?;

    let role = payload.role.unwrap_or(Role::Candidate);

    let result = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (email, password_hash, first_name, last_name, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(role)
    .fetch_one(&state.pool)
    .await;

    let id = match result {
        Ok(id) => id,
        Err(e) => {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return Err(ApiError::conflict("email already exists"));
                }
            }
            return Err(e.into());
        }
    };

    Ok(ApiResponse::created(json!({ "id": id })))
}

/// Signup rules from the original product: institutional email, a password
/// with at least 8 characters containing both cases, a real first name.
fn validate_signup(payload: &SignupRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    let email = payload.email.trim();
    let at_count = email.matches('@').count();
    if email.is_empty() || at_count != 1 || email.starts_with('@') {
        field_errors.insert("email".to_string(), "invalid email address".to_string());
    } else if !email.to_ascii_lowercase().ends_with(INSTITUTIONAL_DOMAIN) {
        field_errors.insert(
            "email".to_string(),
            format!("email must end with {}", INSTITUTIONAL_DOMAIN),
        );
    }

    if !is_strong_password(&payload.password) {
        field_errors.insert("password".to_string(), "weak password".to_string());
    }

    if payload.first_name.trim().chars().count() < 2 {
        field_errors.insert("firstName".to_string(), "first name required".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid signup payload", Some(field_errors)))
    }
}

/// At least 8 characters with at least one lowercase and one uppercase letter.
fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(email: &str, password: &str, first_name: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: None,
            role: None,
        }
    }

    #[test]
    fn accepts_valid_signup() {
        assert!(validate_signup(&payload("alice@csub.edu", "Passw0rd!", "Alice")).is_ok());
    }

    #[test]
    fn domain_check_is_case_insensitive() {
        assert!(validate_signup(&payload("alice@CSUB.EDU", "Passw0rd!", "Alice")).is_ok());
    }

    #[test]
    fn rejects_foreign_domain() {
        let err = validate_signup(&payload("alice@gmail.com", "Passw0rd!", "Alice")).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["email"], "email must end with @csub.edu");
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate_signup(&payload("not-an-email", "Passw0rd!", "Alice")).is_err());
        assert!(validate_signup(&payload("@csub.edu", "Passw0rd!", "Alice")).is_err());
    }

    #[test]
    fn rejects_weak_passwords() {
        // too short
        assert!(!is_strong_password("Ab1!"));
        // no uppercase
        assert!(!is_strong_password("lowercase1!"));
        // no lowercase
        assert!(!is_strong_password("UPPERCASE1!"));
        // acceptable
        assert!(is_strong_password("Passw0rd!"));
    }

    #[test]
    fn rejects_short_first_name() {
        let err = validate_signup(&payload("alice@csub.edu", "Passw0rd!", "A")).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["firstName"], "first name required");
    }

    #[test]
    fn collects_all_field_errors_at_once() {
        let err = validate_signup(&payload("nope", "weak", "")).unwrap_err();
        let body = err.to_json();
        assert!(body["field_errors"]["email"].is_string());
        assert!(body["field_errors"]["password"].is_string());
        assert!(body["field_errors"]["firstName"].is_string());
    }
}
