use actix_web::{
    http::StatusCode,
    web::{Data, Json},
    HttpResponse,
};
use itertools::Itertools;
use log::info;
use serde::Serialize;
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};

use crate::error::Error;
use crate::models::result::ElectionResult;
use crate::models::vote::Vote;
use crate::response::List;

// zero-inclusive: every known politician appears, voted for or not
const FULL_TALLY: &str = "
    SELECT u.id AS politician_id, u.username, COUNT(v.id) AS total_votes
    FROM profiles AS p
    JOIN users AS u ON p.user_id = u.id
    LEFT JOIN votes AS v ON u.id = v.politician_id
    WHERE p.role = 'politician'
    GROUP BY u.id, u.username
    ORDER BY total_votes DESC, u.id";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TallyRow {
    pub politician_id: i32,
    pub username: String,
    pub total_votes: i64,
}

// highest count wins; ties go to the lowest account id
pub(crate) fn pick_winner(rows: Vec<TallyRow>) -> Option<TallyRow> {
    rows.into_iter()
        .min_by(|a, b| b.total_votes.cmp(&a.total_votes).then(a.politician_id.cmp(&b.politician_id)))
}

pub(crate) fn winner_message(username: &str, total: i64) -> String {
    format!("{} has won with {} votes!", username, total)
}

pub(crate) fn standings_message(rows: &[TallyRow]) -> String {
    let body = rows.iter().map(|r| format!("{}: {}", r.username, r.total_votes)).join(", ");
    format!("Voting result: {}", body)
}

pub async fn start_round(db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut tx = db.begin().await?;
    query("DELETE FROM votes").execute(&mut tx).await?;
    query("UPDATE election_state SET voting_open = TRUE WHERE id = 1").execute(&mut tx).await?;
    tx.commit().await?;
    info!("voting round started, ballot ledger cleared");
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

pub async fn stop_round(db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    query("UPDATE election_state SET voting_open = FALSE WHERE id = 1").execute(&mut conn).await?;
    info!("voting round stopped");
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

#[derive(Debug, Serialize)]
pub struct ElectionState {
    voting_open: bool,
    tally: Vec<TallyRow>,
    votes: Vec<Vote>,
}

pub async fn state(db: Data<PgPool>) -> Result<Json<ElectionState>, Error> {
    let mut tx = db.begin().await?;
    let voting_open: bool = query_scalar("SELECT voting_open FROM election_state WHERE id = 1").fetch_one(&mut tx).await?;
    let tally: Vec<TallyRow> = query_as(FULL_TALLY).fetch_all(&mut tx).await?;
    let votes: Vec<Vote> = query_as("SELECT * FROM votes ORDER BY cast_at").fetch_all(&mut tx).await?;
    tx.commit().await?;
    Ok(Json(ElectionState { voting_open, tally, votes }))
}

pub async fn notify_standings(db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut tx = db.begin().await?;
    let tally: Vec<TallyRow> = query_as(FULL_TALLY).fetch_all(&mut tx).await?;
    let message = standings_message(&tally);
    query("INSERT INTO notifications (user_id, message) SELECT id, $1 FROM users")
        .bind(&message)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

pub async fn declare_results(db: Data<PgPool>) -> Result<Json<ElectionResult>, Error> {
    let mut tx = db.begin().await?;
    // grouped over cast votes only: a politician nobody voted for cannot win,
    // and an empty ledger declares nothing
    let counted: Vec<TallyRow> = query_as(
        "SELECT u.id AS politician_id, u.username, COUNT(v.id) AS total_votes
         FROM votes AS v
         JOIN users AS u ON v.politician_id = u.id
         GROUP BY u.id, u.username",
    )
    .fetch_all(&mut tx)
    .await?;
    let winner = pick_winner(counted).ok_or(Error::NoVotes)?;
    let message = winner_message(&winner.username, winner.total_votes);
    let result: ElectionResult = query_as("INSERT INTO results (winner_id, votes, message) VALUES ($1, $2, $3) RETURNING *")
        .bind(winner.politician_id)
        .bind(winner.total_votes)
        .bind(&message)
        .fetch_one(&mut tx)
        .await?;
    // replace, not append: every account keeps only the final announcement
    query("DELETE FROM notifications").execute(&mut tx).await?;
    query("INSERT INTO notifications (user_id, message) SELECT id, $1 FROM users")
        .bind(&message)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    info!("results declared: {}", result.message);
    Ok(Json(result))
}

pub async fn results(db: Data<PgPool>) -> Result<Json<List<ElectionResult>>, Error> {
    let mut conn = db.acquire().await?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM results").fetch_one(&mut conn).await?;
    let list: Vec<ElectionResult> = query_as("SELECT * FROM results ORDER BY declared_at DESC")
        .fetch_all(&mut conn)
        .await?;
    Ok(Json(List::new(list, total)))
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(politician_id: i32, username: &str, total_votes: i64) -> TallyRow {
        TallyRow {
            politician_id,
            username: username.into(),
            total_votes,
        }
    }

    #[test]
    fn test_highest_count_wins() {
        let winner = pick_winner(vec![row(1, "b", 3), row(2, "c", 5)]).unwrap();
        assert_eq!(winner.politician_id, 2);
        assert_eq!(winner.total_votes, 5);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let winner = pick_winner(vec![row(7, "x", 4), row(3, "y", 4), row(9, "z", 4)]).unwrap();
        assert_eq!(winner.politician_id, 3);
    }

    #[test]
    fn test_empty_tally_has_no_winner() {
        assert!(pick_winner(Vec::new()).is_none());
    }

    #[test]
    fn test_standings_message_lists_all() {
        let msg = standings_message(&[row(1, "alice", 5), row(2, "bob", 0)]);
        assert_eq!(msg, "Voting result: alice: 5, bob: 0");
    }

    #[test]
    fn test_winner_message() {
        assert_eq!(winner_message("carol", 5), "carol has won with 5 votes!");
    }
}
