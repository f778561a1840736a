use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Promise {
    pub id: i32,
    pub politician_id: i32,
    pub promise_text: String,
}
