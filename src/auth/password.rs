/**
 * Password Hashing
 *
 * One-way, salted, work-factored password hashing via bcrypt. The salt is
 * generated per hash, so two hashes of the same password differ; only
 * `verify_password` can relate a plaintext to a stored hash.
 *
 * Hashing is intentionally CPU-expensive. Callers on the async request path
 * must run these functions through `tokio::task::spawn_blocking` so a login
 * burst cannot stall unrelated requests.
 */

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a plaintext password with a fresh random salt
///
/// # Errors
///
/// Fails only if bcrypt rejects the input (e.g. interior NUL bytes). The
/// detail is wrapped in `AuthError::Internal` and never shown to clients.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    hash(plaintext, DEFAULT_COST)
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored bcrypt hash
///
/// Returns `false` on mismatch and on any malformed stored hash. A hash
/// that bcrypt cannot parse is attacker-observable no differently from a
/// wrong password.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    verify(plaintext, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hashed = hash_password("p@ssw0rd").unwrap();
        assert!(verify_password("p@ssw0rd", &hashed));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hashed = hash_password("p@ssw0rd").unwrap();
        assert!(!verify_password("not-the-password", &hashed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-input").unwrap();
        let b = hash_password("same-input").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same-input", &a));
        assert!(verify_password("same-input", &b));
    }

    #[test]
    fn test_malformed_hash_is_false_not_panic() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }
}
