use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use thiserror::Error;

/// One-way digest implementation backed by Argon2id.
///
/// Used for two kinds of secrets: user passwords and refresh tokens. In both
/// cases only the PHC-format digest is stored; the plaintext is compared
/// against it with [`Hasher::verify`].
pub struct Hasher;

/// Error type for digest operations.
#[derive(Debug, Clone, Error)]
pub enum HashError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

impl Hasher {
    /// Create a new hasher configured with Argon2id defaults.
    pub fn new() -> Self {
        Self
    }

    /// Digest a secret with a freshly generated random salt.
    ///
    /// # Arguments
    /// * `secret` - Plaintext password or token
    ///
    /// # Returns
    /// PHC string format digest (algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 operation failed
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| HashError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored digest.
    ///
    /// A mismatch is not an error: it returns `Ok(false)`. Only a malformed
    /// digest string produces `VerificationFailed`.
    ///
    /// # Arguments
    /// * `secret` - Plaintext password or token
    /// * `digest` - Stored digest in PHC string format
    ///
    /// # Returns
    /// True if the secret matches the digest
    ///
    /// # Errors
    /// * `VerificationFailed` - Digest format is invalid
    pub fn verify(&self, secret: &str, digest: &str) -> Result<bool, HashError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| {
                HashError::VerificationFailed(format!("Invalid digest: {}", e))
            })?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(secret.as_bytes(), &parsed).is_ok())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
