use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

// historical, append-only; one row per declared round
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ElectionResult {
    pub id: i32,
    pub winner_id: i32,
    pub votes: i64,
    pub message: String,
    pub declared_at: DateTime<Utc>,
}
