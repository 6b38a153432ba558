use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Candidate fields exposed on the session detail and summary views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRef {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
}
