//! One-way password hashing with bcrypt.
//!
//! The digest is a modular-crypt string (`$2b$<cost>$<salt><hash>`), so the
//! salt and cost factor travel with it and nothing else needs to be stored.
//! Hashing and verification run on tokio's blocking pool.

use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use bcrypt::BcryptError;
use thiserror::Error;
use tokio::task::JoinError;

// Hashed once per hasher; checked against when a login names no known user.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failed: {0}")]
    Bcrypt(#[from] BcryptError),

    #[error("blocking hash task failed: {0}")]
    Join(#[from] JoinError),
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: Arc<str>,
    #[cfg(test)]
    verify_calls: Arc<AtomicUsize>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, PasswordError> {
        let dummy_digest = bcrypt::hash(DUMMY_PASSWORD, cost)?;

        Ok(Self {
            cost,
            dummy_digest: dummy_digest.into(),
            #[cfg(test)]
            verify_calls: Arc::default(),
        })
    }

    /// Produce a salted digest of `plaintext`.
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();

        let digest =
            tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(digest)
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// A mismatch is `false`, and so is a digest that cannot be parsed.
    pub async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        #[cfg(test)]
        self.verify_calls.fetch_add(1, Ordering::SeqCst);

        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();

        let matches =
            tokio::task::spawn_blocking(move || verify_digest(&plaintext, &digest)).await?;
        Ok(matches)
    }

    /// Spend one verification's worth of work when there is no stored digest,
    /// so an unknown user costs as much as a wrong password. Always `false`.
    pub async fn verify_absent(&self, plaintext: &str) -> Result<bool, PasswordError> {
        let dummy_digest = Arc::clone(&self.dummy_digest);
        self.verify(plaintext, &dummy_digest).await?;
        Ok(false)
    }

    #[cfg(test)]
    pub(crate) fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

fn verify_digest(plaintext: &str, digest: &str) -> bool {
    match bcrypt::verify(plaintext, digest) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::warn!("stored password digest could not be verified: {}", err);
            false
        }
    }
}
