//! Storage operations for interview sessions and their child rows.
//!
//! Callers are expected to have run the ownership guard first; everything in
//! here assumes the session-level authorization decision is already made.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Answer, CandidateRef, InterviewSession, Question};
use crate::error::ApiError;

/// One question in a batch-create request.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
    pub ordinal: i32,
    pub text: String,
}

/// Full session view: candidate summary fields plus child collections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub candidate: CandidateRef,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

/// Read-only projection returned by the summary endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub candidate: CandidateRef,
    pub questions: i64,
    pub answers: i64,
    pub feedback_count: i64,
}

/// Create a session owned by the given candidate. The candidate must exist;
/// a dangling candidate id is a 404 rather than a foreign-key blowup.
pub async fn create_session(pool: &PgPool, candidate_id: Uuid) -> Result<InterviewSession, ApiError> {
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Err(ApiError::not_found("user not found"));
    }

    let session = sqlx::query_as::<_, InterviewSession>(
        "INSERT INTO interview_sessions (candidate_id) VALUES ($1) RETURNING id, candidate_id, created_at",
    )
    .bind(candidate_id)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// All sessions for one candidate, newest first.
pub async fn list_by_candidate(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<InterviewSession>, ApiError> {
    let sessions = sqlx::query_as::<_, InterviewSession>(
        "SELECT id, candidate_id, created_at FROM interview_sessions \
         WHERE candidate_id = $1 ORDER BY created_at DESC",
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Expand an already-authorized session into its detail view.
pub async fn get_detail(pool: &PgPool, session: InterviewSession) -> Result<SessionDetail, ApiError> {
    let candidate = load_candidate(pool, session.candidate_id).await?;

    let questions = list_questions(pool, session.id).await?;

    let answers = sqlx::query_as::<_, Answer>(
        "SELECT id, session_id, question_id, transcript, ai_json, created_at \
         FROM answers WHERE session_id = $1",
    )
    .bind(session.id)
    .fetch_all(pool)
    .await?;

    Ok(SessionDetail {
        id: session.id,
        candidate_id: session.candidate_id,
        created_at: session.created_at,
        candidate,
        questions,
        answers,
    })
}

/// Questions of a session in presentation order.
pub async fn list_questions(pool: &PgPool, session_id: Uuid) -> Result<Vec<Question>, ApiError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, session_id, ordinal, text FROM questions \
         WHERE session_id = $1 ORDER BY ordinal ASC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// Validate a question batch before anything touches storage.
/// Ordinals may repeat within and across batches; that gap is intentional.
pub fn validate_question_specs(specs: &[QuestionSpec]) -> Result<(), ApiError> {
    if specs.is_empty() {
        return Err(ApiError::validation_error(
            "questions must be a non-empty array",
            None,
        ));
    }

    let mut field_errors = HashMap::new();
    for (i, spec) in specs.iter().enumerate() {
        if spec.ordinal < 1 {
            field_errors.insert(format!("questions[{}].ordinal", i), "ordinal must be >= 1".to_string());
        }
        if spec.text.chars().count() < 3 {
            field_errors.insert(
                format!("questions[{}].text", i),
                "text must be at least 3 characters".to_string(),
            );
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid question batch", Some(field_errors)))
    }
}

/// Insert a question batch as a single transaction: either every row in the
/// batch is persisted or none are. A partially applied batch must never be
/// observable. Returns the created count.
pub async fn create_questions(
    pool: &PgPool,
    session_id: Uuid,
    specs: &[QuestionSpec],
) -> Result<usize, ApiError> {
    validate_question_specs(specs)?;

    let mut tx = pool.begin().await?;

    for spec in specs {
        sqlx::query("INSERT INTO questions (session_id, ordinal, text) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(spec.ordinal)
            .bind(&spec.text)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(specs.len())
}

/// Persist one answer after verifying the question actually belongs to the
/// target session. A question that exists under a different session is an
/// invalid reference (400), not a 404: both ids resolve, the link is wrong.
///
/// The question lookup and the insert are two separate statements. The window
/// between them is accepted: questions are never deleted, so the reference
/// cannot go stale.
pub async fn create_answer(
    pool: &PgPool,
    session_id: Uuid,
    question_id: Uuid,
    transcript: String,
    ai_json: Option<Value>,
) -> Result<Answer, ApiError> {
    let question_session = sqlx::query_scalar::<_, Uuid>("SELECT session_id FROM questions WHERE id = $1")
        .bind(question_id)
        .fetch_optional(pool)
        .await?;

    match question_session {
        Some(owner) if owner == session_id => {}
        _ => return Err(ApiError::invalid_reference("question does not belong to session")),
    }

    let answer = sqlx::query_as::<_, Answer>(
        "INSERT INTO answers (session_id, question_id, transcript, ai_json) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, session_id, question_id, transcript, ai_json, created_at",
    )
    .bind(session_id)
    .bind(question_id)
    .bind(transcript)
    .bind(ai_json)
    .fetch_one(pool)
    .await?;

    Ok(answer)
}

/// Aggregate counts for an already-authorized session.
pub async fn get_summary(pool: &PgPool, session: InterviewSession) -> Result<SessionSummary, ApiError> {
    let candidate = load_candidate(pool, session.candidate_id).await?;

    let (questions, answers, feedback_count) = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT \
            (SELECT COUNT(*) FROM questions WHERE session_id = $1), \
            (SELECT COUNT(*) FROM answers WHERE session_id = $1), \
            (SELECT COUNT(*) FROM feedback WHERE session_id = $1)",
    )
    .bind(session.id)
    .fetch_one(pool)
    .await?;

    Ok(SessionSummary {
        session_id: session.id,
        candidate,
        questions,
        answers,
        feedback_count,
    })
}

async fn load_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<CandidateRef, ApiError> {
    let candidate = sqlx::query_as::<_, CandidateRef>(
        "SELECT id, email, first_name FROM users WHERE id = $1",
    )
    .bind(candidate_id)
    .fetch_one(pool)
    .await?;

    Ok(candidate)
}
