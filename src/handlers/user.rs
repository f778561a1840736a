use actix_web::web::{Data, Json, Query};
use serde::Serialize;
use sqlx::{query_as, query_scalar, FromRow, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::models::user::Profile;
use crate::request::Pagination;
use crate::response::List;
use crate::roles::{Party, Role};

#[derive(Debug, Serialize)]
pub struct Me {
    id: i32,
    username: String,
    email: String,
    profile: Profile,
    has_voted: bool,
}

pub async fn me(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<Me>, Error> {
    let mut conn = db.acquire().await?;
    let (username, email): (String, String) = query_as("SELECT username, email FROM users WHERE id = $1")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    let profile: Profile = query_as("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_info.id)
        .fetch_optional(&mut conn)
        .await?
        .ok_or(Error::Unauthorized)?;
    let has_voted: bool = query_scalar("SELECT EXISTS(SELECT id FROM votes WHERE voter_id = $1)")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(Me {
        id: user_info.id,
        username,
        email,
        profile,
        has_voted,
    }))
}

#[derive(Debug, Serialize, FromRow)]
pub struct Item {
    id: i32,
    username: String,
    email: String,
    role: Role,
    voter_id: Option<String>,
    is_approved: bool,
    party: Option<Party>,
}

// administrator listing of voter and politician accounts
pub async fn list(Query(Pagination { page, size }): Query<Pagination>, db: Data<PgPool>) -> Result<Json<List<Item>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM profiles WHERE role <> 'admin'")
        .fetch_one(&mut conn)
        .await?;
    let list: Vec<Item> = query_as(
        "SELECT u.id, u.username, u.email, p.role, p.voter_id, p.is_approved, p.party
        FROM users AS u
        JOIN profiles AS p ON u.id = p.user_id
        WHERE p.role <> 'admin'
        ORDER BY u.id
        LIMIT $1
        OFFSET $2",
    )
    .bind(size)
    .bind((page - 1) * size)
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(list, total)))
}
