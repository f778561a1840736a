mod context;
mod error;
mod handlers;
mod mailer;
mod middlewares;
pub mod models;
pub mod request;
pub mod response;
pub mod roles;
mod storer;
mod voter_id;

use actix_files::Files;
use actix_web::web::{get, post, resource, scope, Data};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use error::Error;
use mailer::LogMailer;
use middlewares::guard::Guard;
use middlewares::jwt::{Jwt, JWT_SECRET};
use storer::LocalStorer;

static IS_ADMIN: &str = "SELECT EXISTS(SELECT id FROM profiles WHERE user_id = $1 AND role = 'admin')";
static IS_SUPERUSER: &str = "SELECT EXISTS(SELECT id FROM users WHERE id = $1 AND is_superuser)";

// deployments need at least one admin account; create it from the
// environment when configured and absent
async fn bootstrap_admin(pool: &PgPool) -> Result<(), Error> {
    let (username, password) = match (dotenv::var("ADMIN_USERNAME"), dotenv::var("ADMIN_PASSWORD")) {
        (Ok(u), Ok(p)) => (u, p),
        _ => return Ok(()),
    };
    let email = dotenv::var("ADMIN_EMAIL").unwrap_or_default();
    let mut tx = pool.begin().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT id FROM users WHERE username = $1)")
        .bind(&username)
        .fetch_one(&mut tx)
        .await?;
    if exists {
        return Ok(());
    }
    let slt = handlers::random_salt();
    let (id,): (i32,) = sqlx::query_as("INSERT INTO users (username, email, password, salt, is_superuser) VALUES ($1, $2, $3, $4, TRUE) RETURNING id")
        .bind(&username)
        .bind(&email)
        .bind(handlers::hash_password(&password, &slt))
        .bind(&slt)
        .fetch_one(&mut tx)
        .await?;
    sqlx::query("INSERT INTO profiles (user_id, role, is_approved) VALUES ($1, 'admin', TRUE)")
        .bind(id)
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    log::info!("bootstrapped admin account {}", username);
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let upload_path = dotenv::var("UPLOAD_PATH").expect("environment variable UPLOAD_PATH not been set");
    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let mail_from = dotenv::var("MAIL_FROM").unwrap_or_else(|_| "admin@evoting.com".into());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    sqlx::migrate!("./migrations").run(&pool).await.expect("failed to run migrations");
    bootstrap_admin(&pool).await.expect("failed to bootstrap admin account");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(LocalStorer::new(&upload_path)))
            .app_data(Data::new(LogMailer::new(&mail_from)))
            .service(Files::new("/media", &upload_path))
            .service(
                scope("")
                    .service(resource("login").route(post().to(handlers::login)))
                    .service(resource("logout").route(post().to(handlers::logout)))
                    .service(
                        scope("register")
                            .route("public", post().to(handlers::registration::register_public::<LogMailer>))
                            .route("politician", post().to(handlers::registration::register_politician)),
                    )
                    .service(
                        scope("")
                            .wrap(Jwt::new(secret.as_bytes().to_owned()))
                            .service(scope("uploads").route("", post().to(handlers::upload::create::<LocalStorer>)))
                            .service(scope("profile").route("", get().to(handlers::user::me)))
                            .service(scope("notifications").route("", get().to(handlers::notification::list)))
                            .service(scope("politicians").route("", get().to(handlers::politician::list)))
                            .service(
                                scope("promises")
                                    .route("", get().to(handlers::promise::list))
                                    .route("", post().to(handlers::promise::create)),
                            )
                            .service(
                                scope("votes")
                                    .route("", post().to(handlers::ballot::cast))
                                    .route("", get().to(handlers::ballot::status)),
                            )
                            .service(
                                scope("admin")
                                    .wrap(Guard::new(pool.clone(), IS_ADMIN))
                                    .service(scope("users").route("", get().to(handlers::user::list)))
                                    .service(
                                        scope("politicians")
                                            .route("pending", get().to(handlers::politician::pending))
                                            .route("{user_id}/approve", post().to(handlers::politician::approve::<LogMailer>)),
                                    )
                                    .service(
                                        scope("election")
                                            .route("", get().to(handlers::election::state))
                                            .route("start", post().to(handlers::election::start_round))
                                            .route("stop", post().to(handlers::election::stop_round))
                                            .route("notify", post().to(handlers::election::notify_standings))
                                            .route("results", get().to(handlers::election::results))
                                            .service(
                                                scope("declare")
                                                    .wrap(Guard::new(pool.clone(), IS_SUPERUSER))
                                                    .route("", post().to(handlers::election::declare_results)),
                                            ),
                                    ),
                            ),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
