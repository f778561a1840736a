use crate::error::Error;
use rand::{thread_rng, Rng};
use sqlx::{query_scalar, Postgres, Transaction};

pub const VOTER_ID_LEN: usize = 10;

// rejection sampling against the profiles table; the id space is 10^10 so
// collisions are vanishingly rare, but the loop is still bounded
const MAX_ATTEMPTS: usize = 32;

pub fn random_voter_id() -> String {
    let digits = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
    let mut id = String::new();
    let mut rng = thread_rng();
    for _ in 0..VOTER_ID_LEN {
        let i = rng.gen_range(0..10_usize);
        id.push(digits[i]);
    }
    id
}

pub async fn assign_voter_id(tx: &mut Transaction<'_, Postgres>) -> Result<String, Error> {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = random_voter_id();
        let taken: bool = query_scalar("SELECT EXISTS(SELECT id FROM profiles WHERE voter_id = $1)")
            .bind(&candidate)
            .fetch_one(&mut *tx)
            .await?;
        if !taken {
            return Ok(candidate);
        }
    }
    Err(Error::ServerError("could not allocate a unique voter id".into()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_voter_id_is_ten_digits() {
        for _ in 0..100 {
            let id = random_voter_id();
            assert_eq!(id.len(), VOTER_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
