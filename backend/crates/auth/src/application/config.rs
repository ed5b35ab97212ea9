//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;
use platform::cookie::CookieConfig;
use platform::password::Pbkdf2Hasher;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "X-Session-ID";

/// Upper bound on the session lifetime
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthConfigError {
    #[error("session secret must not be empty")]
    EmptySecret,

    #[error("session expiry must be positive")]
    NonPositiveExpiry,

    #[error("session expiry must not exceed {MAX_SESSION_TTL_DAYS} days")]
    ExpiryTooLong,

    #[error("session refresh threshold must be positive and shorter than the expiry")]
    RefreshNotBeforeExpiry,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// HMAC key signing the session token
    pub session_secret: Vec<u8>,
    /// Session lifetime from creation
    pub session_ttl: Duration,
    /// Age after which a live session is rotated
    pub session_refresh_after: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Frozen PBKDF2 parameters
    pub password_hasher: Pbkdf2Hasher,
    /// Requests under this prefix skip the session check
    pub public_path_prefix: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            session_secret: Vec::new(),
            session_ttl: Duration::hours(12),
            session_refresh_after: Duration::hours(1),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            password_hasher: Pbkdf2Hasher::default(),
            public_path_prefix: "/auth".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn validate(&self) -> Result<(), AuthConfigError> {
        if self.session_secret.is_empty() {
            return Err(AuthConfigError::EmptySecret);
        }
        if self.session_ttl <= Duration::zero() {
            return Err(AuthConfigError::NonPositiveExpiry);
        }
        if self.session_ttl > Duration::days(MAX_SESSION_TTL_DAYS) {
            return Err(AuthConfigError::ExpiryTooLong);
        }
        if self.session_refresh_after <= Duration::zero()
            || self.session_refresh_after >= self.session_ttl
        {
            return Err(AuthConfigError::RefreshNotBeforeExpiry);
        }
        Ok(())
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }

    /// Whether `path` is under the public prefix (segment boundary)
    pub fn is_public_path(&self, path: &str) -> bool {
        let prefix = self.public_path_prefix.trim_end_matches('/');
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
