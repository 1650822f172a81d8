//! Configuration management for storefront
//!
//! This module handles loading, parsing, and validating application configuration
//! from YAML files and environment variables.

use std::path::Path;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use crate::auth::manager::lifetime;

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Demo data configuration
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileRead(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_with(yaml, process_env)
    }

    /// Parse configuration from YAML, resolving `${VAR}` through `lookup`
    pub fn from_yaml_with<F>(yaml: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = expand_env_vars(yaml, lookup);
        serde_yaml::from_str(&expanded)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from environment variables with prefix STOREFRONT_
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    /// Load configuration from prefixed variables resolved through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key));
        let mut config = Config::default();

        // Server config from env
        if let Some(host) = env_var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_var("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid port number".to_string()))?;
        }

        // Auth config from env
        if let Some(secret) = env_var("AUTH_SECRET_KEY") {
            config.auth.secret_key = Some(secret);
        }
        if let Some(algorithm) = env_var("AUTH_ALGORITHM") {
            config.auth.algorithm = algorithm;
        }
        if let Some(minutes) = env_var("AUTH_ACCESS_TOKEN_EXPIRE_MINUTES") {
            config.auth.access_token_expire_minutes = minutes.parse().map_err(|_| {
                ConfigError::Parse("Invalid access token lifetime".to_string())
            })?;
        }
        if let Some(minutes) = env_var("AUTH_DEFAULT_TOKEN_TTL_MINUTES") {
            config.auth.default_token_ttl_minutes = minutes
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid default token lifetime".to_string()))?;
        }

        // Database config from env
        if let Some(path) = env_var("DATABASE_PATH") {
            config.database.path = path;
        }

        if let Some(enabled) = env_var("SEED_ENABLED") {
            config.seed.enabled = enabled
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid seed flag: {}", enabled)))?;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = env_var("LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Check values that serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingRequired("auth.secret_key".to_string()));
        }

        let algorithm = self.auth.algorithm()?;
        if !crate::auth::jwt::is_hmac(algorithm) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.algorithm must be HS256, HS384 or HS512, got {}",
                self.auth.algorithm
            )));
        }

        lifetime(
            "auth.access_token_expire_minutes",
            self.auth.access_token_expire_minutes,
        )?;
        lifetime(
            "auth.default_token_ttl_minutes",
            self.auth.default_token_ttl_minutes,
        )?;

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidValue(format!(
                "logging.format must be json or pretty, got {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens
    pub secret_key: Option<String>,

    /// Signing algorithm identifier
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Lifetime of tokens issued at login (minutes)
    #[serde(default = "default_access_token_expire")]
    pub access_token_expire_minutes: i64,

    /// Lifetime of tokens issued without an explicit TTL (minutes)
    #[serde(default = "default_token_ttl")]
    pub default_token_ttl_minutes: i64,
}

impl AuthConfig {
    /// Parse the algorithm identifier
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> {
        Algorithm::from_str(&self.algorithm).map_err(|_| {
            ConfigError::InvalidValue(format!("Unknown signing algorithm: {}", self.algorithm))
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            algorithm: default_algorithm(),
            access_token_expire_minutes: default_access_token_expire(),
            default_token_ttl_minutes: default_token_ttl(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expire() -> i64 {
    crate::auth::ACCESS_TOKEN_EXPIRE_MINUTES
}

fn default_token_ttl() -> i64 {
    crate::auth::DEFAULT_TOKEN_TTL_MINUTES
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "storefront.db".to_string()
}

/// Demo data configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedConfig {
    /// Insert demo users and products at startup
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

fn default_seed_enabled() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (`json` or `pretty`)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(String),

    /// Error parsing configuration
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Expand environment variables in a string
///
/// Supports `${VAR_NAME}` syntax. Unset variables are left as written.
fn expand_env_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .expect("Invalid regex pattern for environment variable expansion");

    re.replace_all(input, |caps: &regex_lite::Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
