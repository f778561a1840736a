use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    HttpMessage,
};
use sqlx::{query_scalar, PgPool};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::task::Poll;

use crate::context::UserInfo;

// gates a scope behind a boolean SQL predicate over the caller's id ($1)
pub struct Guard {
    db: PgPool,
    sql_stmt: String,
}

impl Guard {
    pub fn new(db: PgPool, sql_stmt: &str) -> Self {
        Self {
            db,
            sql_stmt: sql_stmt.into(),
        }
    }
}

impl<S> Transform<S, ServiceRequest> for Guard
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type Response = S::Response;
    type Error = S::Error;
    type InitError = ();
    type Transform = GuardMiddleware<S>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GuardMiddleware {
            db: self.db.clone(),
            sql_stmt: self.sql_stmt.clone(),
            service,
        }))
    }
}

pub struct GuardMiddleware<S> {
    db: PgPool,
    sql_stmt: String,
    service: S,
}

impl<S> Service<ServiceRequest> for GuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<ServiceResponse, Self::Error>>>>;
    fn poll_ready(&self, _: &mut core::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let user_info = req.extensions().get::<UserInfo>().cloned();
        if let Some(user_info) = user_info {
            let stmt = self.sql_stmt.clone();
            let db = self.db.clone();
            let next = self.service.call(req);
            return Box::pin(async move {
                match db.acquire().await {
                    Ok(mut conn) => {
                        let allowed: Result<bool, sqlx::Error> = query_scalar(&stmt).bind(user_info.id).fetch_one(&mut conn).await;
                        match allowed {
                            Ok(allowed) => {
                                if !allowed {
                                    return Err(actix_web::error::ErrorForbidden("forbidden"));
                                }
                                next.await
                            }
                            Err(err) => Err(actix_web::error::ErrorInternalServerError(err)),
                        }
                    }
                    Err(err) => Err(actix_web::error::ErrorInternalServerError(err)),
                }
            });
        }
        Box::pin(async move { Err(actix_web::error::ErrorUnauthorized("unauthorized")) })
    }
}
