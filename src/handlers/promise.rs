use actix_web::web::{Data, Json, Query};
use serde::{Deserialize, Serialize};
use sqlx::{query_as, query_scalar, FromRow, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::promise::Promise;
use crate::response::List;
use crate::roles::{Capability, Role};

#[derive(Debug, Serialize, FromRow)]
pub struct Item {
    id: i32,
    politician_id: i32,
    username: String,
    promise_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    politician_id: Option<i32>,
}

pub async fn list(Query(ListParams { politician_id }): Query<ListParams>, db: Data<PgPool>) -> Result<Json<List<Item>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM promises WHERE ($1 IS NULL OR politician_id = $1)")
        .bind(politician_id)
        .fetch_one(&mut conn)
        .await?;
    let list: Vec<Item> = query_as(
        "SELECT pr.id, pr.politician_id, u.username, pr.promise_text
        FROM promises AS pr
        JOIN users AS u ON pr.politician_id = u.id
        WHERE ($1 IS NULL OR pr.politician_id = $1)
        ORDER BY pr.id",
    )
    .bind(politician_id)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(list, total)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromiseCreation {
    promise_text: String,
}

pub async fn create(user_info: UserInfo, Json(PromiseCreation { promise_text }): Json<PromiseCreation>, db: Data<PgPool>) -> Result<Json<Promise>, Error> {
    let mut tx = db.begin().await?;
    let role: Option<Role> = query_scalar("SELECT role FROM profiles WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_optional(&mut tx)
        .await?;
    let role = role.ok_or(Error::Unauthorized)?;
    if !role.allows(Capability::PublishPromise) {
        return Err(Error::Unauthorized);
    }
    let promise: Promise = query_as("INSERT INTO promises (politician_id, promise_text) VALUES ($1, $2) RETURNING *")
        .bind(user_info.id)
        .bind(&promise_text)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(Json(promise))
}
