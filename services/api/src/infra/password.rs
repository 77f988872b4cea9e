use anyhow::Context as _;

use crate::error::ApiError;

/// bcrypt hashing run off the async executor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    pub cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("join password hash task")?
            .context("hash password")?;
        Ok(hash)
    }

    /// Spend the same work as a verify without a stored hash to compare to.
    pub async fn burn(&self, password: &str) -> Result<(), ApiError> {
        self.hash(password).await.map(drop)
    }

    /// `Ok(false)` on mismatch; a malformed stored hash is an internal error.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("join password verify task")?
            .context("verify password")?;
        Ok(matches)
    }
}
