//! Auth gate - the single-admin login exchange and token checks.

use std::sync::Arc;

use crate::ports::{AuthError, PasswordService, TokenService};

/// Configured admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    /// Argon2 PHC digest. Without it nobody can log in.
    pub password_hash: Option<String>,
}

/// An authenticated admin, decoded from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
    pub expires_at: i64,
}

/// Stateless gate: every check re-validates the token, nothing is stored
/// server-side, so a token stays valid until its expiry.
pub struct AuthGate {
    admin: AdminCredentials,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthGate {
    pub fn new(
        admin: AdminCredentials,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            admin,
            tokens,
            passwords,
        }
    }

    /// Exchange credentials for a signed token.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.admin.username {
            tracing::warn!("Login attempt with unknown username");
            return Err(AuthError::InvalidCredentials);
        }

        let digest = match self.admin.password_hash.as_deref() {
            Some(digest) if !digest.is_empty() => digest,
            _ => {
                tracing::error!("Admin password digest is not configured");
                return Err(AuthError::NotConfigured);
            }
        };

        let valid = self.passwords.verify(password, digest).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Password verification failed");
            false
        });
        if !valid {
            tracing::warn!(username = %username, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(username)?;
        tracing::info!(username = %username, "Admin logged in");
        Ok(token)
    }

    /// Check a presented token. Never fails: anything invalid is `None`.
    pub fn authenticate(&self, token: Option<&str>) -> Option<AdminSession> {
        let token = token.filter(|t| !t.is_empty())?;

        match self.tokens.validate_token(token) {
            Ok(claims) if claims.username == self.admin.username => Some(AdminSession {
                username: claims.username,
                expires_at: claims.exp,
            }),
            Ok(claims) => {
                tracing::debug!(username = %claims.username, "Token for a non-admin subject");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected admin token");
                None
            }
        }
    }

    /// Lifetime of issued tokens, used for the cookie max-age.
    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }
}
