//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FACTORY_URL` - Base URL of the external pizza factory
//! - `FACTORY_API_KEY` - API key presented to the factory as a bearer credential
//! - `ADMIN_EMAIL` - Email of the bootstrap admin account
//! - `ADMIN_PASSWORD` - Password of the bootstrap admin account
//!
//! ## Optional
//! - `PRONTO_HOST` - Bind address (default: 127.0.0.1)
//! - `PRONTO_PORT` - Listen port (default: 3000)
//! - `FACTORY_TIMEOUT_SECS` - Factory request timeout (default: 10)
//! - `ADMIN_NAME` - Display name of the bootstrap admin (default: "service admin")

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Service application configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// External factory collaborator configuration
    pub factory: FactoryConfig,
    /// Bootstrap admin account created at startup
    pub admin: AdminSeedConfig,
}

/// Pizza factory collaborator configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FactoryConfig {
    /// Factory base URL (e.g., <https://factory.pronto.pizza>)
    pub url: String,
    /// API key sent as the bearer credential on fulfillment requests
    pub api_key: SecretString,
    /// Upper bound on a single fulfillment request
    pub timeout: Duration,
}

impl std::fmt::Debug for FactoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Bootstrap admin account configuration.
///
/// The seed account replaces a hidden default-admin singleton: it is created
/// explicitly at process start if no user with this email exists.
#[derive(Clone)]
pub struct AdminSeedConfig {
    /// Display name of the seed account
    pub name: String,
    /// Email of the seed account
    pub email: String,
    /// Password of the seed account
    pub password: SecretString,
}

impl std::fmt::Debug for AdminSeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeedConfig")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PRONTO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRONTO_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("PRONTO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRONTO_PORT".to_owned(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            factory: FactoryConfig::from_env()?,
            admin: AdminSeedConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FactoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("FACTORY_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FACTORY_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            url: get_required_env("FACTORY_URL")?,
            api_key: get_required_secret("FACTORY_API_KEY")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AdminSeedConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            name: get_env_or_default("ADMIN_NAME", "service admin"),
            email: get_required_env("ADMIN_EMAIL")?,
            password: get_required_secret("ADMIN_PASSWORD")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
