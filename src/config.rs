use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::token::DEFAULT_TTL;

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),

    #[error("environment variable {name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_addr: SocketAddr,
    pub cors_origin: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("max_connections", &self.max_connections)
            .field("server_addr", &self.server_addr)
            .field("cors_origin", &self.cors_origin)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_algorithm = match lookup("JWT_ALGORITHM") {
            Some(raw) => parse_algorithm(&raw)?,
            None => Algorithm::HS256,
        };

        let ttl_minutes: u64 = parse_or(
            "ACCESS_TOKEN_TTL_MINUTES",
            &lookup,
            DEFAULT_TTL.as_secs() / 60,
        )?;
        if ttl_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_TTL_MINUTES",
                reason: "must be at least 1".to_string(),
            });
        }

        let token_ttl_secs = ttl_minutes
            .checked_mul(60)
            .ok_or_else(|| ConfigError::Invalid {
                name: "ACCESS_TOKEN_TTL_MINUTES",
                reason: format!("{} minutes does not fit in seconds", ttl_minutes),
            })?;

        let bcrypt_cost: u32 = parse_or("BCRYPT_COST", &lookup, bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                reason: format!("{} is outside 4..=31", bcrypt_cost),
            });
        }

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr: SocketAddr =
            server_addr
                .parse()
                .map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
                    name: "SERVER_ADDR",
                    reason: err.to_string(),
                })?;

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", &lookup, 10)?,
            server_addr,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            jwt_secret,
            jwt_algorithm,
            token_ttl: Duration::from_secs(token_ttl_secs),
            bcrypt_cost,
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            reason: err.to_string(),
        }),
        None => Ok(default),
    }
}

// Tokens are signed with a shared secret, so only the HMAC family applies.
fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(raw.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            reason: format!("{} is not one of HS256, HS384, HS512", raw),
        }),
    }
}
