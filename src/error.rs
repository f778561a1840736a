use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("multipart error: {0}")]
    MultipartError(#[from] actix_multipart::MultipartError),

    #[error("dotenv error")]
    DotEnvError(#[from] dotenv::Error),

    #[error("jwt error")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("{0} is already taken")]
    DuplicateIdentity(String),

    #[error("account is pending admin approval")]
    NotApproved,

    #[error("you have already voted")]
    AlreadyVoted,

    #[error("invalid voter id")]
    IdentityMismatch,

    #[error("politician not found or not approved")]
    UnknownPolitician,

    #[error("voting is not open")]
    VotingClosed,

    #[error("no votes to count")]
    NoVotes,

    #[error("no permission")]
    Unauthorized,

    #[error("failed to deliver message: {0}")]
    DeliveryFailure(String),

    #[error("business error: {0}")]
    BusinessError(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateIdentity(_) | Error::BusinessError(_) | Error::MultipartError(_) => StatusCode::BAD_REQUEST,
            Error::NotApproved | Error::IdentityMismatch | Error::Unauthorized => StatusCode::FORBIDDEN,
            Error::UnknownPolitician => StatusCode::NOT_FOUND,
            Error::AlreadyVoted | Error::VotingClosed | Error::NoVotes => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
