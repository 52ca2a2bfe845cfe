//! Password hashing and verification using bcrypt.

use crate::error::{AppError, AppResult};

/// Hash a password for storage. A failure of the hashing primitive is
/// logged and surfaced as an authentication failure, never a panic.
pub fn hash(plain: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        AppError::InvalidCredentials
    })
}

/// Verify a password against a stored hash. A malformed hash verifies
/// as `false` rather than erroring.
pub fn verify(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST: u32 = 4;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash("hunter2hunter2", COST).unwrap();
        assert!(verify("hunter2hunter2", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash("hunter2hunter2", COST).unwrap();
        assert!(!verify("hunter3hunter3", &hash));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify("hunter2hunter2", "not-a-bcrypt-hash"));
        assert!(!verify("hunter2hunter2", ""));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("hunter2hunter2", COST).unwrap();
        let b = hash("hunter2hunter2", COST).unwrap();
        assert_ne!(a, b);
        assert!(verify("hunter2hunter2", &a));
        assert!(verify("hunter2hunter2", &b));
    }
}
