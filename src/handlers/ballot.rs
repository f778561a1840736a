use actix_web::web::{Data, Json};
use serde::{Deserialize, Serialize};
use sqlx::{query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::error::Error;
use crate::response::CreateResponse;
use crate::roles::{Capability, Role};

#[derive(Debug, Clone, Deserialize)]
pub struct CastRequest {
    voter_id: String,
    politician_id: i32,
}

pub(crate) fn claim_matches(stored: Option<&str>, claim: &str) -> bool {
    match stored {
        Some(stored) => stored == claim,
        None => false,
    }
}

pub async fn cast(user_info: UserInfo, Json(CastRequest { voter_id, politician_id }): Json<CastRequest>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    let mut tx = db.begin().await?;
    let open: bool = query_scalar("SELECT voting_open FROM election_state WHERE id = 1 FOR SHARE")
        .fetch_one(&mut tx)
        .await?;
    if !open {
        return Err(Error::VotingClosed);
    }
    let caller: Option<(Role, Option<String>)> = query_as("SELECT role, voter_id FROM profiles WHERE user_id = $1 FOR UPDATE")
        .bind(user_info.id)
        .fetch_optional(&mut tx)
        .await?;
    let (role, stored) = caller.ok_or(Error::Unauthorized)?;
    if !role.allows(Capability::CastVote) {
        return Err(Error::Unauthorized);
    }
    let already: bool = query_scalar("SELECT EXISTS(SELECT id FROM votes WHERE voter_id = $1)")
        .bind(user_info.id)
        .fetch_one(&mut tx)
        .await?;
    if already {
        return Err(Error::AlreadyVoted);
    }
    if !claim_matches(stored.as_deref(), &voter_id) {
        return Err(Error::IdentityMismatch);
    }
    let target_ok: bool = query_scalar("SELECT EXISTS(SELECT id FROM profiles WHERE user_id = $1 AND role = 'politician' AND is_approved)")
        .bind(politician_id)
        .fetch_one(&mut tx)
        .await?;
    if !target_ok {
        return Err(Error::UnknownPolitician);
    }
    // the unique constraint on votes.voter_id backs the advisory check above:
    // a concurrent duplicate surfaces here as a 23505
    let inserted: Result<(i32,), sqlx::Error> = query_as("INSERT INTO votes (voter_id, politician_id) VALUES ($1, $2) RETURNING id")
        .bind(user_info.id)
        .bind(politician_id)
        .fetch_one(&mut tx)
        .await;
    let (id,) = inserted.map_err(|e| match &e {
        sqlx::Error::Database(err) if err.code().as_deref() == Some("23505") => Error::AlreadyVoted,
        _ => Error::DatabaseError(e),
    })?;
    tx.commit().await?;
    Ok(Json(CreateResponse { id }))
}

#[derive(Debug, Serialize)]
pub struct VoteStatus {
    has_voted: bool,
}

pub async fn status(user_info: UserInfo, db: Data<PgPool>) -> Result<Json<VoteStatus>, Error> {
    let mut conn = db.acquire().await?;
    let has_voted: bool = query_scalar("SELECT EXISTS(SELECT id FROM votes WHERE voter_id = $1)")
        .bind(user_info.id)
        .fetch_one(&mut conn)
        .await?;
    Ok(Json(VoteStatus { has_voted }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_claim_must_match_stored_id() {
        assert!(claim_matches(Some("0123456789"), "0123456789"));
        assert!(!claim_matches(Some("0123456789"), "9876543210"));
    }

    #[test]
    fn test_missing_stored_id_never_matches() {
        assert!(!claim_matches(None, "0123456789"));
        assert!(!claim_matches(None, ""));
    }
}
