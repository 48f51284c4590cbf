//! Application configuration loaded from environment variables.
//!
//! Built once in `main` and handed to the constructors that need it.

use std::env;

use folio_core::services::AdminCredentials;
use folio_infra::JwtConfig;
use folio_infra::auth::DEFAULT_SECRET as DEFAULT_JWT_SECRET;

#[cfg(feature = "github")]
use folio_infra::GitHubConfig;

const DEFAULT_TOKEN_HOURS: i64 = 24 * 7;
const MAX_TOKEN_HOURS: i64 = 24 * 365;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub admin: AdminCredentials,
    pub jwt: JwtConfig,
    /// Set the `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
    /// GitHub repository holding the posts. `None` runs on the in-memory store.
    #[cfg(feature = "github")]
    pub github: Option<GitHubConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            admin: AdminCredentials {
                username: "admin".to_string(),
                password_hash: None,
            },
            jwt: JwtConfig::default(),
            cookie_secure: false,
            #[cfg(feature = "github")]
            github: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let is_production = env::var("RUST_ENV")
            .map(|v| v == "production" || v == "prod")
            .unwrap_or(false);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            admin: AdminCredentials {
                username: env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
                password_hash: env::var("ADMIN_PASSWORD_HASH")
                    .ok()
                    .filter(|h| !h.is_empty()),
            },
            jwt: Self::jwt_from_env(is_production),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(is_production),
            #[cfg(feature = "github")]
            github: Self::github_from_env(),
        }
    }

    fn jwt_from_env(is_production: bool) -> JwtConfig {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_JWT_SECRET {
            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        JwtConfig {
            secret,
            expiration_hours: token_hours(env::var("JWT_EXPIRATION_HOURS").ok().as_deref()),
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "folio".to_string()),
        }
    }

    /// All of GITHUB_TOKEN, GITHUB_OWNER and GITHUB_REPO must be set.
    #[cfg(feature = "github")]
    fn github_from_env() -> Option<GitHubConfig> {
        let token = env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty());
        let owner = env::var("GITHUB_OWNER").ok().filter(|v| !v.is_empty());
        let repo = env::var("GITHUB_REPO").ok().filter(|v| !v.is_empty());

        match (token, owner, repo) {
            (Some(token), Some(owner), Some(repo)) => {
                let mut config = GitHubConfig::new(token, owner, repo);
                if let Ok(branch) = env::var("GITHUB_BRANCH") {
                    config.branch = branch;
                }
                if let Ok(api_url) = env::var("GITHUB_API_URL") {
                    config.api_url = api_url;
                }
                Some(config)
            }
            (None, None, None) => None,
            _ => {
                tracing::warn!("GitHub environment variables not fully configured");
                None
            }
        }
    }
}

/// Token lifetime in hours, falling back to the default when unset or out of range.
fn token_hours(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_TOKEN_HOURS;
    };

    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_TOKEN_HOURS).contains(&hours) => hours,
        _ => {
            tracing::warn!(
                value = %raw,
                max = MAX_TOKEN_HOURS,
                "JWT_EXPIRATION_HOURS out of range, using default of {} hours",
                DEFAULT_TOKEN_HOURS
            );
            DEFAULT_TOKEN_HOURS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hours_accepts_range() {
        assert_eq!(token_hours(None), DEFAULT_TOKEN_HOURS);
        assert_eq!(token_hours(Some("1")), 1);
        assert_eq!(token_hours(Some(" 48 ")), 48);
        assert_eq!(token_hours(Some("8760")), MAX_TOKEN_HOURS);
    }

    #[test]
    fn test_token_hours_rejects_unusable_values() {
        for raw in ["0", "-5", "8761", "9223372036854775807", "soon", ""] {
            assert_eq!(token_hours(Some(raw)), DEFAULT_TOKEN_HOURS, "{raw:?}");
        }
    }
}
