//! Argon2 digests for the admin password.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use folio_core::ports::{AuthError, PasswordService};

/// Produces and checks argon2 PHC strings, the format expected in
/// `ADMIN_PASSWORD_HASH`.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::HashingError(
                "refusing to hash an empty password".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, AuthError> {
        // Tolerate whitespace around the digest
        let digest = PasswordHash::new(digest.trim())
            .map_err(|e| AuthError::HashingError(format!("malformed digest: {}", e)))?;

        if !digest.algorithm.as_str().starts_with("argon2") {
            return Err(AuthError::HashingError(format!(
                "unsupported digest algorithm '{}'",
                digest.algorithm
            )));
        }

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &digest)
            .is_ok())
    }
}
