use sha2::{Digest, Sha256};
use tracing::error;

use crate::auth::error::AuthError;

/// Hex SHA-256 pre-digest. bcrypt only reads the first 72 bytes of its
/// input; hashing the fixed-width digest instead lifts that cap.
fn prehash(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    if plain.is_empty() {
        return Err(AuthError::InvalidInput(
            "password must not be empty".into(),
        ));
    }
    bcrypt::hash(prehash(plain), cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        AuthError::Internal(e.to_string())
    })
}

/// A corrupted or non-bcrypt stored hash counts as a failed verification.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(prehash(plain), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");
        assert!(verify_password(password, &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn verify_is_false_on_malformed_hash() {
        assert!(!verify_password("anything", "not-a-valid-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn hash_rejects_empty_password() {
        let err = hash_password("", TEST_COST).unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }

    #[test]
    fn hash_never_stores_the_plaintext() {
        let password = "pw123";
        let hash = hash_password(password, TEST_COST).expect("hashing should succeed");
        assert!(!hash.is_empty());
        assert_ne!(hash, password);
        assert!(!hash.contains(password));
    }

    #[test]
    fn long_passwords_roundtrip() {
        let password = "x".repeat(10_000);
        let hash = hash_password(&password, TEST_COST).expect("hashing should succeed");
        assert!(verify_password(&password, &hash));
    }

    #[test]
    fn pre_digest_distinguishes_past_the_bcrypt_cap() {
        // Raw bcrypt would truncate both to the same 72 bytes
        let a = "a".repeat(100);
        let mut b = "a".repeat(99);
        b.push('b');
        let hash = hash_password(&a, TEST_COST).expect("hashing should succeed");
        assert!(!verify_password(&b, &hash));
    }
}
