/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `API_PRODUCTION`: Enables HSTS and `Secure` cookies (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_SECRET`: Cookie signing secret, at least 32 characters (required)
/// - `SESSION_MAX_AGE_HOURS`: Absolute session lifetime (default: 24)
/// - `SESSION_PRUNE_INTERVAL_SECS`: Expired-session sweep period (default: 86400)
/// - `SESSION_COOKIE_NAME`: Session cookie name (default: loanlead.sid)
/// - `DEFAULT_ADMIN_USERNAME` / `DEFAULT_ADMIN_PASSWORD`: Bootstrap admin
///   account (default: admin / adminpass)
/// - `RUST_LOG`: Log filter, `LOG_FORMAT=json` for JSON logs
///
/// # Example
///
/// ```no_run
/// use loanlead_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use loanlead_shared::storage::bootstrap::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use serde::{Deserialize, Serialize};
use std::env;

/// Minimum accepted length of `SESSION_SECRET`
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// Bootstrap admin account
    pub admin: AdminConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (HTTPS assumed)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Master secret the cookie signing key is derived from
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Absolute session lifetime in hours
    pub max_age_hours: i64,

    /// Seconds between expired-session sweeps
    pub prune_interval_secs: u64,

    /// Cookie name
    pub cookie_name: String,
}

/// Bootstrap admin account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,

    #[serde(skip_serializing)]
    pub password: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let api_port = var("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = var("API_CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let production = matches!(
            var("API_PRODUCTION", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            );
        }

        let max_age_hours = var("SESSION_MAX_AGE_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("SESSION_MAX_AGE_HOURS is invalid: {}", e))?;
        if max_age_hours <= 0 {
            anyhow::bail!("SESSION_MAX_AGE_HOURS must be positive");
        }

        let prune_interval_secs = var("SESSION_PRUNE_INTERVAL_SECS", "86400")
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("SESSION_PRUNE_INTERVAL_SECS is invalid: {}", e))?;
        if prune_interval_secs == 0 {
            anyhow::bail!("SESSION_PRUNE_INTERVAL_SECS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host: var("API_HOST", "0.0.0.0"),
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections,
            },
            session: SessionConfig {
                secret: session_secret,
                max_age_hours,
                prune_interval_secs,
                cookie_name: var("SESSION_COOKIE_NAME", "loanlead.sid"),
            },
            admin: AdminConfig {
                username: var("DEFAULT_ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
                password: var("DEFAULT_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Absolute session lifetime
    pub fn session_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session.max_age_hours)
    }
}
