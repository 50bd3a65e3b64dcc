//! Personal todo list backend with per-user ownership and bearer-token auth.
//!
//! Users register at `/auth/auth`, trade credentials for a signed token at
//! `/auth/token`, and present that token to the `/todos` routes, which are
//! scoped to the caller.

use sqlx::{Pool, Sqlite};

pub mod config;
pub mod credential_store;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod password;
pub mod route;
pub mod schema;
pub mod todo_store;
pub mod token;

pub use config::Config;
pub use route::create_router;

use crate::{
    password::{PasswordError, PasswordHasher},
    token::TokenIssuer,
};

// Struct representing the application state
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub tokens: TokenIssuer,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: &Config) -> Result<Self, PasswordError> {
        Ok(Self {
            db,
            tokens: TokenIssuer::new(
                config.jwt_secret.as_bytes(),
                config.jwt_algorithm,
                config.token_ttl,
            ),
            hasher: PasswordHasher::new(config.bcrypt_cost)?,
        })
    }
}
