use thiserror::Error;

pub use bcrypt::DEFAULT_COST;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password with bcrypt at the given work factor (4..=31)
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

/// `hash_password` on the blocking pool, for use from request handlers
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost)).await?
}

/// `verify_password` on the blocking pool, for use from request handlers
pub async fn verify_password_blocking(password: String, stored: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum work factor keeps the suite fast
    const TEST_COST: u32 = 4;

    #[test]
    fn verifies_matching_password_only() {
        let stored = hash_password("P@ss1234", TEST_COST).unwrap();
        assert!(stored.starts_with("$2"));
        assert!(!stored.contains("P@ss1234"));
        assert!(verify_password("P@ss1234", &stored));
        assert!(!verify_password("P@ss1235", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same", TEST_COST).unwrap();
        let b = hash_password("same", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn hash_records_its_work_factor() {
        let stored = hash_password("P@ss7391", 5).unwrap();
        assert_eq!(&stored[4..7], "05$");
        assert!(verify_password("P@ss7391", &stored));
    }

    #[test]
    fn out_of_range_cost_is_an_error() {
        assert!(hash_password("x", 3).is_err());
        assert!(hash_password("x", 32).is_err());
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "P@ss1234"));
        assert!(!verify_password("x", "sha256$aa$bb"));
    }

    #[tokio::test]
    async fn blocking_helpers_agree_with_sync_versions() {
        let stored = hash_password_blocking("P@ss4321".to_string(), TEST_COST).await.unwrap();
        assert!(verify_password_blocking("P@ss4321".to_string(), stored.clone()).await);
        assert!(!verify_password_blocking("P@ss4322".to_string(), stored).await);
    }
}
