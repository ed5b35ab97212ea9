//! Process configuration read from the environment

use std::net::SocketAddr;
use std::time::Duration;

use auth::AuthConfig;
use auth::config::AuthConfigError;
use inventory::InventoryConfig;
use platform::password::{MIN_ITERATIONS, PasswordHashError, Pbkdf2Hasher};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthConfigError),

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
    pub inventory: InventoryConfig,
    /// `None` disables the background sweep
    pub session_sweep_interval: Option<Duration>,
    pub frontend_origins: Vec<String>,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, e.g. a map in tests
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = match env.get("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgresql://{}:{}@{}:{}/{}",
                env.require("POSTGRES_USER")?,
                env.require("POSTGRES_PASSWORD")?,
                env.require("POSTGRES_HOST")?,
                env.require("POSTGRES_PORT")?,
                env.require("POSTGRES_DB")?,
            ),
        };

        let session_ttl = env.seconds("USER_SESSION_EXPIRY")?;
        let session_refresh_after = env.seconds("USER_SESSION_REFRESH")?;
        let password_hasher = Pbkdf2Hasher::new(
            env.parse_required("SALT_SIZE")?,
            env.parse_or("PASSWORD_HASH_ITERATIONS", MIN_ITERATIONS)?,
        )?;

        let auth = AuthConfig {
            session_secret: env.require("SECRET_KEY")?.into_bytes(),
            session_ttl,
            session_refresh_after,
            cookie_secure: env.parse_or("COOKIE_SECURE", false)?,
            password_hasher,
            ..AuthConfig::default()
        };
        auth.validate()?;

        let inventory = InventoryConfig {
            enforce_non_negative_quantity: env.parse_or("ENFORCE_NON_NEGATIVE_QUANTITY", true)?,
        };

        let sweep_secs: u64 = env.parse_or("SESSION_SWEEP_INTERVAL", 0)?;

        let frontend_origins = env
            .get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            auth,
            inventory,
            session_sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            frontend_origins,
            bind_addr: env.parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, var: &str) -> Option<String> {
        (self.0)(var).filter(|value| !value.trim().is_empty())
    }

    fn require(&self, var: &'static str) -> Result<String, ConfigError> {
        self.get(var).ok_or(ConfigError::Missing(var))
    }

    fn parse<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
    }

    fn parse_required<T>(&self, var: &'static str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Self::parse(var, &self.require(var)?)
    }

    fn seconds(&self, var: &'static str) -> Result<chrono::Duration, ConfigError> {
        let secs: i64 = self.parse_required(var)?;
        chrono::Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
            var,
            reason: format!("{secs} seconds is out of range"),
        })
    }

    fn parse_or<T>(&self, var: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(var) {
            Some(raw) => Self::parse(var, &raw),
            None => Ok(default),
        }
    }
}
