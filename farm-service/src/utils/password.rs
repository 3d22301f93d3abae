use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use std::fmt;

/// Plain-text password as submitted by a caller. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Argon2id hash in PHC string form, salt included.
pub fn hash_password(password: &Password) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

/// False for a wrong password and for a stored hash that does not parse.
pub fn verify_password(password: &Password, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_str().as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: Password) -> Result<String, anyhow::Error> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool. A panicked task counts as a mismatch.
pub async fn verify_password_blocking(password: Password, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("correct horse");
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&password, &hash));
        assert!(!verify_password(&Password::new("wrong horse"), &hash));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password(&Password::new("anything"), "not-a-phc-string"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", Password::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_blocking_pool_hash_and_verify() {
        let hash = hash_password_blocking(Password::new("s3cret!"))
            .await
            .expect("Failed to hash password");

        assert!(verify_password_blocking(Password::new("s3cret!"), hash.clone()).await);
        assert!(!verify_password_blocking(Password::new("nope"), hash).await);
    }
}
