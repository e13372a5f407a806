//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool
//! instead of the async workers.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::OnceCell;

/// Input for the throwaway hash used by [`PasswordHasher::verify_dummy`].
const DUMMY_PASSWORD: &str = "no-account-has-this-password";

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Salted hash of `password`. The salt is embedded in the output.
    pub async fn hash(&self, password: &str) -> anyhow::Result<String> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")
    }

    /// Compare `password` against a stored hash.
    pub async fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("password verification task failed")?
            .context("stored password hash is malformed")
    }

    /// Spend the same bcrypt work as [`verify`](Self::verify) when there is
    /// no stored hash to check against. Always `false`.
    ///
    /// The throwaway hash is computed once, at this hasher's cost.
    pub async fn verify_dummy(&self, password: &str) -> anyhow::Result<bool> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
            .await?;
        self.verify(password, hash).await?;
        Ok(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(crate::config::MIN_BCRYPT_COST)
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = fast();
        let hash = hasher.hash("secret").await.unwrap();

        assert_ne!(hash, "secret");
        assert!(hasher.verify("secret", &hash).await.unwrap());
        assert!(!hasher.verify("Secret", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_different_hashes() {
        let hasher = fast();
        let first = hasher.hash("secret").await.unwrap();
        let second = hasher.hash("secret").await.unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first).await.unwrap());
        assert!(hasher.verify("secret", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_cost_is_encoded_in_hash() {
        let hash = fast().hash("secret").await.unwrap();
        assert!(hash.starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        assert!(fast().verify("secret", "not-a-bcrypt-hash").await.is_err());
    }

    #[tokio::test]
    async fn test_verify_dummy_never_matches() {
        let hasher = fast();
        assert!(!hasher.verify_dummy("secret").await.unwrap());
        assert!(!hasher.verify_dummy(DUMMY_PASSWORD).await.unwrap());
    }

    #[tokio::test]
    async fn test_dummy_hash_uses_configured_cost_and_is_shared() {
        let hasher = fast();
        let clone = hasher.clone();
        hasher.verify_dummy("secret").await.unwrap();

        let cached = clone.dummy_hash.get().expect("dummy hash should be cached");
        assert!(cached.starts_with("$2b$04$"));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(PasswordHasher::default().cost(), 10);
    }
}
