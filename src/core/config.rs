//! Configuration management

use clap::Parser;
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid security configuration: {0}")]
    InvalidSecurity(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_with_args(cli_args)
    }

    fn load_with_args(cli_args: CliArgs) -> Result<Self, ConfigError> {
        let mut builder = Self::builder_with_defaults()?;

        // Config file, if specified (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // Environment variables (higher priority), prefixed with ORCA_ and
        // using __ for nesting. Example: ORCA_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("ORCA")
                .separator("__")
                .try_parsing(true),
        );

        // CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = Self::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn builder_with_defaults(
    ) -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.environment", "development")?
            .set_default("server.request_timeout", 30)?
            .set_default("server.max_body_size", 10_485_760)? // 10 MB
            .set_default("database.path", "./data/orcamentos.db")?
            .set_default("database.connection_pool_size", 20)?
            .set_default("database.busy_timeout", 5000)?
            .set_default("cache.url", None::<String>)?
            .set_default("security.jwt_secret", "change-this-secret-in-production")?
            .set_default(
                "security.jwt_refresh_secret",
                "change-this-refresh-secret-in-production",
            )?
            .set_default("security.access_token_ttl", 900)? // 15 minutes
            .set_default("security.refresh_token_ttl", 604_800)? // 7 days
            .set_default("security.bcrypt_cost", 12)?
            .set_default("security.allowed_origins", vec!["*"])?
            .set_default("security.rate_limit_requests", 100)?
            .set_default("security.rate_limit_window", 900)? // 15 minutes
            .set_default("security.enable_hsts", false)?
            .set_default("security.hsts_max_age", 31_536_000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("logging.output", "stdout")?;
        Ok(builder)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.security.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Command-line arguments for configuration override
#[derive(Debug, Parser)]
#[command(name = "orcamentos-api")]
#[command(about = "Orcamentos API Server", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// "development" or "production"; gates 500 response detail
    pub environment: String,
    pub request_timeout: u64, // seconds
    pub max_body_size: usize, // bytes
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer(
                "port must be greater than 0".to_string(),
            ));
        }

        let valid_environments = ["development", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(ConfigError::InvalidServer(format!(
                "environment must be one of: {:?}",
                valid_environments
            )));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_body_size == 0 {
            return Err(ConfigError::InvalidServer(
                "max_body_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: usize,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase(
                "connection_pool_size must be greater than 0".to_string(),
            ));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Cache layer connection. The cache is optional; when no URL is configured
/// the service runs without it and the health endpoint reports it as such.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Access tokens and refresh tokens are signed with distinct secrets so
    /// compromise of one does not compromise the other.
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_ttl: u64,  // seconds
    pub refresh_token_ttl: u64, // seconds
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
    pub rate_limit_requests: usize,
    pub rate_limit_window: u64, // seconds
    pub enable_hsts: bool,
    pub hsts_max_age: u64, // seconds
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "jwt_secret cannot be empty".to_string(),
            ));
        }

        if self.jwt_refresh_secret.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "jwt_refresh_secret cannot be empty".to_string(),
            ));
        }

        if self.jwt_secret == self.jwt_refresh_secret {
            return Err(ConfigError::InvalidSecurity(
                "jwt_secret and jwt_refresh_secret must differ".to_string(),
            ));
        }

        if self.access_token_ttl == 0 || self.refresh_token_ttl == 0 {
            return Err(ConfigError::InvalidSecurity(
                "token TTLs must be greater than 0".to_string(),
            ));
        }

        // bcrypt's valid cost range
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidSecurity(
                "bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "allowed_origins cannot be empty".to_string(),
            ));
        }

        if self.rate_limit_requests == 0 {
            return Err(ConfigError::InvalidSecurity(
                "rate_limit_requests must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_window == 0 {
            return Err(ConfigError::InvalidSecurity(
                "rate_limit_window must be greater than 0".to_string(),
            ));
        }

        if self.enable_hsts && self.hsts_max_age == 0 {
            return Err(ConfigError::InvalidSecurity(
                "hsts_max_age must be greater than 0 when enable_hsts is true".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                environment: "development".to_string(),
                request_timeout: 30,
                max_body_size: 10_485_760,
            },
            database: DatabaseConfig {
                path: PathBuf::from("./data/orcamentos.db"),
                connection_pool_size: 20,
                busy_timeout: 5000,
            },
            cache: CacheConfig { url: None },
            security: SecurityConfig {
                jwt_secret: "access-secret".to_string(),
                jwt_refresh_secret: "refresh-secret".to_string(),
                access_token_ttl: 900,
                refresh_token_ttl: 604_800,
                bcrypt_cost: 12,
                allowed_origins: vec!["*".to_string()],
                rate_limit_requests: 100,
                rate_limit_window: 900,
                enable_hsts: false,
                hsts_max_age: 31_536_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                output: "stdout".to_string(),
                log_file: None,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_environment_rejected() {
        let mut config = test_config();
        config.server.environment = "staging".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_jwt_secrets_rejected() {
        let mut config = test_config();
        config.security.jwt_refresh_secret = config.security.jwt_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bcrypt_cost_range_enforced() {
        let mut config = test_config();
        config.security.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.security.bcrypt_cost = 32;
        assert!(config.validate().is_err());
        config.security.bcrypt_cost = 12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_logging_requires_path() {
        let mut config = test_config();
        config.logging.output = "file".to_string();
        config.logging.log_file = None;
        assert!(config.validate().is_err());

        config.logging.log_file = Some(PathBuf::from("./logs/api.log"));
        assert!(config.validate().is_ok());
    }
}
