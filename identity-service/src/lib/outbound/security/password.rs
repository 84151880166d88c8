use auth::HashError;
use auth::Hasher;

use crate::domain::auth::errors::HashingError;
use crate::domain::auth::ports::PasswordHasher;

/// Argon2id-backed implementation of the `PasswordHasher` port, adapting the
/// hasher from the auth library. Digests passwords at rest and refresh
/// tokens on the session record.
pub struct Argon2PasswordHasher {
    inner: Hasher,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            inner: Hasher::new(),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, HashingError> {
        self.inner.hash(plain).map_err(map_hash_error)
    }

    fn verify(&self, plain: &str, digest: &str) -> Result<bool, HashingError> {
        self.inner.verify(plain, digest).map_err(map_hash_error)
    }
}

fn map_hash_error(e: HashError) -> HashingError {
    match e {
        HashError::HashingFailed(msg) => HashingError::HashingFailed(msg),
        HashError::VerificationFailed(msg) => HashingError::VerificationFailed(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hasher = Argon2PasswordHasher::new();

        let digest = hasher.hash("Abc12345!").unwrap();
        assert!(digest.starts_with("$argon2"));
        assert!(hasher.verify("Abc12345!", &digest).unwrap());
        assert!(!hasher.verify("Abc12345?", &digest).unwrap());
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        assert!(matches!(
            hasher.verify("Abc12345!", "garbage"),
            Err(HashingError::VerificationFailed(_))
        ));
    }
}
