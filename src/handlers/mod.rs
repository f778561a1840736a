pub mod ballot;
pub mod election;
pub mod notification;
pub mod politician;
pub mod promise;
pub mod registration;
pub mod upload;
pub mod user;

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder},
    http::StatusCode,
    web::{Data, Json},
    HttpResponse, HttpResponseBuilder,
};
use hex::ToHex;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{query_as, PgPool};
use std::ops::Add;

use crate::error::Error;
use crate::middlewares::jwt::{gen_token, Claim, JWT_SECRET, JWT_TOKEN};
use crate::models::user::{Profile, User};
use crate::roles::Role;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let chars = vec![
        '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
        'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    ];
    let mut slt = String::new();
    let mut rng = thread_rng();
    for _ in 0..32 {
        let i = rng.gen_range(0..chars.len());
        slt.push(chars[i]);
    }
    slt
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub role: Role,
}

pub async fn login(Json(Login { username, password }): Json<Login>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut conn = db.acquire().await?;
    if let Some(user) = query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(&username)
        .fetch_optional(&mut conn)
        .await?
    {
        if hash_password(&password, &user.salt) != user.password {
            return Err(Error::BusinessError("invalid username or password".into()));
        }
        let profile: Profile = query_as("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user.id)
            .fetch_optional(&mut conn)
            .await?
            .ok_or_else(|| Error::BusinessError("account has no profile".into()))?;
        if profile.role == Role::Politician && !profile.is_approved {
            return Err(Error::NotApproved);
        }
        if !user.is_active {
            return Err(Error::NotApproved);
        }
        let claim = Claim {
            user: user.id.to_string(),
            exp: chrono::Utc::now().add(chrono::Duration::days(30)).timestamp(),
        };
        let secret = dotenv::var(JWT_SECRET)?;
        let token = gen_token(secret.as_bytes(), &claim)?;
        return Ok(HttpResponse::build(StatusCode::OK)
            .cookie(Cookie::new(JWT_TOKEN, token))
            .json(LoginResponse { role: profile.role }));
    }
    Err(Error::BusinessError("invalid username or password".into()))
}

pub async fn logout() -> HttpResponse {
    HttpResponseBuilder::new(StatusCode::OK)
        .cookie(CookieBuilder::new(JWT_TOKEN, "").expires(OffsetDateTime::now_utc()).finish())
        .finish()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_password_deterministic() {
        assert_eq!(hash_password("secret", "salt"), hash_password("secret", "salt"));
    }

    #[test]
    fn test_hash_password_salted() {
        assert_ne!(hash_password("secret", "salt a"), hash_password("secret", "salt b"));
    }

    #[test]
    fn test_random_salt_length() {
        assert_eq!(random_salt().len(), 32);
    }
}
