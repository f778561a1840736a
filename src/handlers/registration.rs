use actix_web::web::{Data, Json};
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool};

use crate::error::Error;
use crate::handlers::{hash_password, random_salt};
use crate::mailer::Mailer;
use crate::response::CreateResponse;
use crate::roles::{Party, Role};
use crate::voter_id::assign_voter_id;

fn voter_id_mail(username: &str, voter_id: &str) -> String {
    format!(
        "Dear {},\n\n\
         Thank you for registering with the E-Voting system.\n\n\
         Your unique 10-digit Voter ID is: {}\n\n\
         You will need this ID to cast your vote. Please keep it secure.\n\n\
         Regards,\n\
         E-Voting Team",
        username, voter_id
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicRegistration {
    username: String,
    email: String,
    password: String,
}

pub async fn register_public<M: Mailer>(
    Json(PublicRegistration { username, email, password }): Json<PublicRegistration>,
    db: Data<PgPool>,
    mailer: Data<M>,
) -> Result<Json<CreateResponse>, Error> {
    let mut tx = db.begin().await?;
    let taken: bool = query_scalar("SELECT EXISTS(SELECT id FROM users WHERE username = $1)")
        .bind(&username)
        .fetch_one(&mut tx)
        .await?;
    if taken {
        return Err(Error::DuplicateIdentity(username));
    }
    let slt = random_salt();
    let (id,): (i32,) = query_as("INSERT INTO users (username, email, password, salt) VALUES ($1, $2, $3, $4) RETURNING id")
        .bind(&username)
        .bind(&email)
        .bind(hash_password(&password, &slt))
        .bind(&slt)
        .fetch_one(&mut tx)
        .await?;
    let voter_id = assign_voter_id(&mut tx).await?;
    query("INSERT INTO profiles (user_id, role, voter_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(Role::Public)
        .bind(&voter_id)
        .execute(&mut tx)
        .await?;
    // send before commit so a delivery failure rolls the registration back
    mailer.send(&email, "E-Voting System - Your Voter ID", &voter_id_mail(&username, &voter_id))?;
    tx.commit().await?;
    Ok(Json(CreateResponse { id }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoliticianRegistration {
    username: String,
    email: String,
    password: String,
    party: Party,
    image: Option<String>,
}

pub async fn register_politician(
    Json(PoliticianRegistration {
        username,
        email,
        password,
        party,
        image,
    }): Json<PoliticianRegistration>,
    db: Data<PgPool>,
) -> Result<Json<CreateResponse>, Error> {
    let mut tx = db.begin().await?;
    let taken: bool = query_scalar("SELECT EXISTS(SELECT id FROM users WHERE username = $1)")
        .bind(&username)
        .fetch_one(&mut tx)
        .await?;
    if taken {
        return Err(Error::DuplicateIdentity(username));
    }
    let slt = random_salt();
    // inactive until an administrator approves the account
    let (id,): (i32,) = query_as("INSERT INTO users (username, email, password, salt, is_active) VALUES ($1, $2, $3, $4, FALSE) RETURNING id")
        .bind(&username)
        .bind(&email)
        .bind(hash_password(&password, &slt))
        .bind(&slt)
        .fetch_one(&mut tx)
        .await?;
    query("INSERT INTO profiles (user_id, role, party, image, is_approved) VALUES ($1, $2, $3, $4, FALSE)")
        .bind(id)
        .bind(Role::Politician)
        .bind(party)
        .bind(&image)
        .execute(&mut tx)
        .await?;
    query("INSERT INTO notifications (user_id, message) SELECT id, $1 FROM users WHERE is_superuser")
        .bind(format!("New politician {} is awaiting approval.", username))
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(Json(CreateResponse { id }))
}
