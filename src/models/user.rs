use serde::Serialize;
use sqlx::FromRow;

use crate::roles::{Party, Role};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub role: Role,
    pub voter_id: Option<String>,
    pub party: Option<Party>,
    pub is_approved: bool,
    pub image: Option<String>,
}
