use actix_web::web::{Data, Json, Path};
use serde::Serialize;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};

use crate::error::Error;
use crate::mailer::Mailer;
use crate::response::{List, UpdateResponse};
use crate::roles::Party;
use crate::voter_id::assign_voter_id;

fn approval_mail(username: &str, voter_id: &str) -> String {
    format!(
        "Dear {},\n\n\
         Your account as a politician has been approved in the E-Voting system.\n\n\
         Your unique 10-digit Voter ID is: {}\n\n\
         Please use this ID to cast your vote.\n\n\
         Best regards,\n\
         E-Voting Admin",
        username, voter_id
    )
}

#[derive(Debug, Serialize, FromRow)]
pub struct Item {
    id: i32,
    username: String,
    party: Option<Party>,
    image: Option<String>,
}

// candidates offered on the voting screen: approved politicians only
pub async fn list(db: Data<PgPool>) -> Result<Json<List<Item>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM profiles WHERE role = 'politician' AND is_approved")
        .fetch_one(&mut conn)
        .await?;
    let list: Vec<Item> = query_as(
        "SELECT u.id, u.username, p.party, p.image
        FROM profiles AS p
        JOIN users AS u ON p.user_id = u.id
        WHERE p.role = 'politician' AND p.is_approved
        ORDER BY u.id",
    )
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(list, total)))
}

#[derive(Debug, Serialize, FromRow)]
pub struct PendingItem {
    id: i32,
    username: String,
    email: String,
    party: Option<Party>,
    image: Option<String>,
}

pub async fn pending(db: Data<PgPool>) -> Result<Json<List<PendingItem>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM profiles WHERE role = 'politician' AND NOT is_approved")
        .fetch_one(&mut conn)
        .await?;
    let list: Vec<PendingItem> = query_as(
        "SELECT u.id, u.username, u.email, p.party, p.image
        FROM profiles AS p
        JOIN users AS u ON p.user_id = u.id
        WHERE p.role = 'politician' AND NOT p.is_approved
        ORDER BY u.id",
    )
    .fetch_all(&mut conn)
    .await?;
    Ok(Json(List::new(list, total)))
}

// idempotent: re-approving changes nothing and assigns no second voter id
pub async fn approve<M: Mailer>(user_id: Path<(i32,)>, db: Data<PgPool>, mailer: Data<M>) -> Result<Json<UpdateResponse>, Error> {
    let user_id = user_id.into_inner().0;
    let mut tx = db.begin().await?;
    let target: Option<(bool, Option<String>, String, String)> = query_as(
        "SELECT p.is_approved, p.voter_id, u.username, u.email
        FROM profiles AS p
        JOIN users AS u ON p.user_id = u.id
        WHERE p.user_id = $1 AND p.role = 'politician'
        FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut tx)
    .await?;
    let (was_approved, voter_id, username, email) = target.ok_or(Error::UnknownPolitician)?;
    let voter_id = match voter_id {
        Some(v) => v,
        None => {
            let v = assign_voter_id(&mut tx).await?;
            query("UPDATE profiles SET voter_id = $1 WHERE user_id = $2")
                .bind(&v)
                .bind(user_id)
                .execute(&mut tx)
                .await?;
            v
        }
    };
    let updated = if was_approved {
        0
    } else {
        query("UPDATE profiles SET is_approved = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        query("UPDATE users SET is_active = TRUE WHERE id = $1")
            .bind(user_id)
            .execute(&mut tx)
            .await?;
        1
    };
    mailer.send(&email, "E-Voting System - You Are Approved", &approval_mail(&username, &voter_id))?;
    tx.commit().await?;
    Ok(Json(UpdateResponse::new(updated)))
}
