use actix_web::web::{Data, Json};
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::notification::Notification;
use crate::response::List;

pub async fn list(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<List<Notification>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    let list: Vec<Notification> = query_as("SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_info.id)
        .fetch_all(&mut conn)
        .await?;
    Ok(Json(List::new(list, total)))
}
