use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    HttpMessage,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::task::Poll;

use crate::context::UserInfo;
use crate::error::Error;

pub static JWT_TOKEN: &str = "JWT_TOKEN";
pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

pub fn gen_token(secret: &[u8], claim: &Claim) -> Result<String, Error> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret);
    let token = encode(&header, claim, &key)?;
    Ok(token)
}

pub fn verify_token(secret: &[u8], token: &str) -> Result<Claim, Error> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);
    let payload = decode(token, &key, &validation)?;
    Ok(payload.claims)
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Transform = JwtMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtMiddleware {
            secret: self.secret.clone(),
            service,
        }))
    }
}

pub struct JwtMiddleware<S> {
    secret: Vec<u8>,
    service: S,
}

impl<S> Service<ServiceRequest> for JwtMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, _: &mut core::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // the login handler issues a cookie; API clients may send the token
        // as a bearer header instead
        let token = req.cookie(JWT_TOKEN).map(|c| c.value().to_owned()).or_else(|| {
            req.headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(|v| v.trim_start_matches("Bearer ").to_owned())
        });
        let token = match token {
            Some(t) => t,
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in request")) }),
        };
        match verify_token(&self.secret, &token) {
            Err(e) => Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Ok(claim) => match claim.user.parse::<i32>() {
                Err(e) => Box::pin(async move { Err(ErrorUnauthorized(e)) }),
                Ok(id) => {
                    req.extensions_mut().insert(UserInfo { id });
                    let res_fut = self.service.call(req);
                    Box::pin(async move { res_fut.await })
                }
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::ops::Add;

    #[test]
    fn test_gen_and_verify_token() {
        let secret = b"0123456789";
        let claim = Claim {
            user: "42".into(),
            exp: chrono::Utc::now().add(chrono::Duration::minutes(5)).timestamp(),
        };
        let token = gen_token(secret, &claim).unwrap();
        let c = verify_token(secret, &token).unwrap();
        assert_eq!(claim.user, c.user);
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = b"0123456789";
        let claim = Claim {
            user: "42".into(),
            exp: chrono::Utc::now().add(chrono::Duration::days(-1)).timestamp(),
        };
        let token = gen_token(secret, &claim).unwrap();
        assert!(verify_token(secret, &token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claim = Claim {
            user: "42".into(),
            exp: chrono::Utc::now().add(chrono::Duration::minutes(5)).timestamp(),
        };
        let token = gen_token(b"0123456789", &claim).unwrap();
        assert!(verify_token(b"another secret", &token).is_err());
    }
}
