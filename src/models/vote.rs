use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vote {
    pub id: i32,
    pub voter_id: i32,
    pub politician_id: i32,
    pub cast_at: DateTime<Utc>,
}
