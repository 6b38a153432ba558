use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: Uuid,
    pub transcript: String,
    /// Opaque grading payload, stored as given and never validated.
    pub ai_json: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
