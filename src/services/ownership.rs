//! Ownership guard for the two-level resource chain
//! (user -> interview session -> question/answer).
//!
//! Every protected access follows the same order: existence check, then
//! ownership check, then the operation itself. A missing session is a 404
//! before any permission is evaluated, so the API never reveals permission
//! decisions for resources that do not exist.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{InterviewSession, Role};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Read-path rule: admins may see any session, everyone else only their own.
pub fn authorize(user: &AuthUser, candidate_id: Uuid) -> Result<(), ApiError> {
    if user.role == Role::Admin || user.id == candidate_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("forbidden"))
    }
}

/// Write-path rule: only the owning candidate. There is deliberately no
/// admin override for writes; an admin cannot append questions or answers
/// to somebody else's session.
pub fn require_owner(user: &AuthUser, candidate_id: Uuid) -> Result<(), ApiError> {
    if user.id == candidate_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("forbidden"))
    }
}

/// Resolve a session by id, or 404.
pub async fn load_session(pool: &PgPool, session_id: Uuid) -> Result<InterviewSession, ApiError> {
    let session = sqlx::query_as::<_, InterviewSession>(
        "SELECT id, candidate_id, created_at FROM interview_sessions WHERE id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    session.ok_or_else(|| ApiError::not_found("session not found"))
}

/// Existence check, then read-path ownership check.
pub async fn load_session_authorized(
    pool: &PgPool,
    session_id: Uuid,
    user: &AuthUser,
) -> Result<InterviewSession, ApiError> {
    let session = load_session(pool, session_id).await?;
    authorize(user, session.candidate_id)?;
    Ok(session)
}

/// Existence check, then write-path ownership check.
pub async fn load_session_owned(
    pool: &PgPool,
    session_id: Uuid,
    user: &AuthUser,
) -> Result<InterviewSession, ApiError> {
    let session = load_session(pool, session_id).await?;
    require_owner(user, session.candidate_id)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: "someone@csub.edu".to_string(),
            role,
        }
    }

    #[test]
    fn owner_may_read() {
        let candidate = user(Role::Candidate);
        assert!(authorize(&candidate, candidate.id).is_ok());
    }

    #[test]
    fn admin_may_read_any() {
        let admin = user(Role::Admin);
        assert!(authorize(&admin, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let candidate = user(Role::Candidate);
        let err = authorize(&candidate, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn interviewer_is_not_an_admin() {
        let interviewer = user(Role::Interviewer);
        assert!(authorize(&interviewer, Uuid::new_v4()).is_err());
    }

    #[test]
    fn writes_have_no_admin_override() {
        let admin = user(Role::Admin);
        assert!(require_owner(&admin, Uuid::new_v4()).is_err());
        assert!(require_owner(&admin, admin.id).is_ok());
    }
}
