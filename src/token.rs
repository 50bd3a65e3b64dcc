//! Signed, time-limited bearer tokens.
//!
//! Tokens are compact JWS strings carrying `{sub, id, exp}`. They are never
//! persisted; identity is rebuilt from the signed payload on every request.

use std::{fmt, time::Duration};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::CurrentUser;

/// Lifetime used when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(20 * 60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed or missing required claims")]
    Malformed,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    sub: &'a str,
    id: i64,
    exp: u64,
}

// Decoded shape; absent identity claims are caught after the signature check.
#[derive(Debug, Deserialize)]
struct UntrustedClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    id: Option<i64>,
}

#[derive(Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            algorithm,
            ttl,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `username` that expires `ttl` from now.
    pub fn issue(
        &self,
        username: &str,
        user_id: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: username,
            id: user_id,
            exp: get_current_timestamp().saturating_add(self.ttl.as_secs()),
        };
        self.sign(&claims)
    }

    /// Check signature and expiry, then resolve the identity the token carries.
    pub fn verify(&self, token: &str) -> Result<CurrentUser, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<UntrustedClaims>(token, &self.decoding_key, &validation).map_err(
            |err| match err.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        match (data.claims.sub, data.claims.id) {
            (Some(username), Some(user_id)) if !username.is_empty() && user_id != 0 => {
                Ok(CurrentUser { username, user_id })
            }
            _ => Err(TokenError::Malformed),
        }
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
    }
}
