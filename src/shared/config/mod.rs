//! Application configuration module
//!
//! Configuration is assembled from an optional TOML file (path taken from
//! `QUILLPRESS_CONFIG`) and then overridden by environment variables:
//!
//! | Variable       | Field          | Default       |
//! |----------------|----------------|---------------|
//! | `SERVER_HOST`  | `bind_addr`    | `0.0.0.0`     |
//! | `SERVER_PORT`  | `bind_addr`    | `3000`        |
//! | `DATABASE_URL` | `database_url` | unset         |
//! | `JWT_SECRET`   | `jwt_secret`   | dev fallback  |
//! | `APP_ENV`      | `environment`  | `development` |
//!
//! The server binary loads `.env` into the process environment before
//! calling [`AppConfig::load`].

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Env var holding the optional TOML config path
pub const CONFIG_PATH_ENV: &str = "QUILLPRESS_CONFIG";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEV_JWT_SECRET: &str = "quillpress-development-secret";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidValue {
                key: "APP_ENV",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to, `host:port`
    pub bind_addr: String,
    /// Postgres connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: String,
    pub environment: Environment,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the config file named by `QUILLPRESS_CONFIG` and the process
    /// environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_ENV).ok();
        Self::from_sources(file.as_deref().map(Path::new), |key| std::env::var(key).ok())
    }

    /// Load from an optional TOML file, then apply overrides from `env`
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = match file {
            Some(path) => AppConfigBuilder::from_file(path)?,
            None => AppConfigBuilder::default(),
        };
        builder = builder.apply_env(env)?;
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let port = self
            .bind_addr
            .rsplit_once(':')
            .map(|(host, port)| (host.is_empty(), port.parse::<u16>()));
        match port {
            Some((false, Ok(_))) => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "bind_addr",
                    value: self.bind_addr.clone(),
                })
            }
        }

        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }

        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// TOML file layout
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    environment: Option<Environment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    environment: Option<Environment>,
}

impl AppConfigBuilder {
    /// Start from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw)?;

        Ok(Self {
            host: file.server.host,
            port: file.server.port,
            database_url: file.database_url,
            jwt_secret: file.jwt_secret,
            environment: file.environment,
        })
    }

    /// Override fields with any variables `env` provides
    pub fn apply_env<F>(mut self, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("SERVER_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = get("SERVER_PORT") {
            let parsed = port.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: port.clone(),
            })?;
            self.port = Some(parsed);
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(environment) = get("APP_ENV") {
            self.environment = Some(environment.parse()?);
        }
        Ok(self)
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let environment = self.environment.unwrap_or_default();

        let jwt_secret = match self.jwt_secret {
            Some(secret) => secret,
            None if environment == Environment::Production => {
                return Err(ConfigError::MissingValue("JWT_SECRET"));
            }
            None => {
                tracing::warn!("JWT_SECRET not set. Using the development fallback secret.");
                DEV_JWT_SECRET.to_string()
            }
        };

        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = self.port.unwrap_or(DEFAULT_PORT);

        let config = AppConfig {
            bind_addr: format!("{}:{}", host, port),
            database_url: self.database_url,
            jwt_secret,
            environment,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
