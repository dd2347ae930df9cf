//! Configuration settings structures for shopdesk
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "shopdesk".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_name() -> String {
    "shopdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_jwt_secret() -> String {
    String::new()
}

fn default_access_token_expiration() -> i64 {
    24 // hours
}

fn default_otp_step() -> u64 {
    30 // seconds
}

fn default_otp_window() -> u64 {
    5 // accepted steps on either side of "now"
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Document store connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection URI
    #[serde(default)]
    pub uri: String,

    /// Database name
    #[serde(default = "default_database_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            name: default_database_name(),
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing access tokens; supply via environment in
    /// production, never commit it
    #[serde(default = "default_jwt_secret")]
    pub secret: String,

    /// Access token expiration time in hours
    #[serde(default = "default_access_token_expiration")]
    pub access_token_expiration: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            access_token_expiration: default_access_token_expiration(),
        }
    }
}

impl JwtConfig {
    /// Validates the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty",
            ));
        }

        if self.secret.len() < 32 {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret should be at least 32 characters for security",
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// One-time code Configuration
// ============================================================================

/// Time-step one-time code configuration for password resets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Shared secret the codes are derived from
    #[serde(default)]
    pub secret: String,

    /// Length of one time step in seconds
    #[serde(default = "default_otp_step")]
    pub step_seconds: u64,

    /// Number of steps on either side of the current one accepted during
    /// verification
    #[serde(default = "default_otp_window")]
    pub window: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            step_seconds: default_otp_step(),
            window: default_otp_window(),
        }
    }
}

impl OtpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "otp.secret",
                "OTP secret cannot be empty",
            ));
        }

        if self.step_seconds == 0 {
            return Err(ConfigError::validation(
                "otp.step_seconds",
                "OTP step must be positive",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// One-time code configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,
}

impl Settings {
    /// Validates the loaded settings as a whole
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.uri.is_empty() {
            return Err(ConfigError::validation(
                "database.uri",
                "Database URI cannot be empty",
            ));
        }

        self.jwt.validate()?;
        self.otp.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        Settings {
            database: DatabaseConfig {
                uri: "mongodb://localhost:27017".to_string(),
                name: "shopdesk_test".to_string(),
            },
            jwt: JwtConfig {
                secret: "a".repeat(32),
                access_token_expiration: 24,
            },
            otp: OtpConfig {
                secret: "otp-shared-secret".to_string(),
                step_seconds: 30,
                window: 5,
            },
            ..Settings::default()
        }
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_server_config_address() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_jwt_config_validate_empty_secret() {
        let config = JwtConfig {
            secret: String::new(),
            access_token_expiration: 24,
        };
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError { field, message }) = result {
            assert_eq!(field, "jwt.secret");
            assert!(message.contains("cannot be empty"));
        }
    }

    #[test]
    fn test_jwt_config_validate_short_secret() {
        let config = JwtConfig {
            secret: "short".to_string(),
            access_token_expiration: 24,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jwt_config_validate_negative_expiration() {
        let config = JwtConfig {
            secret: "a".repeat(32),
            access_token_expiration: -1,
        };
        let result = config.validate();
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError { field, .. }) = result {
            assert_eq!(field, "jwt.access_token_expiration");
        }
    }

    #[test]
    fn test_otp_config_validate() {
        assert!(OtpConfig::default().validate().is_err());
        let config = OtpConfig {
            secret: "secret".to_string(),
            step_seconds: 30,
            window: 5,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_validate_requires_database_uri() {
        let mut settings = valid_settings();
        settings.database.uri = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_validate_success() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = valid_settings();
        let toml_str = toml::to_string(&settings).expect("Failed to serialize");
        let deserialized: Settings = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let toml_str = r#"
            [application]
            name = "my-app"

            [server]
            port = 8080
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(settings.application.name, "my-app");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1"); // default
        assert_eq!(settings.jwt.access_token_expiration, 24); // default
        assert_eq!(settings.otp.step_seconds, 30); // default
    }

    #[test]
    fn test_settings_deserialize_full() {
        let toml_str = r#"
            [application]
            name = "test-app"
            version = "1.0.0"

            [server]
            host = "0.0.0.0"
            port = 8080
            allowed_origins = ["https://shop.example.com"]

            [database]
            uri = "mongodb://localhost:27017"
            name = "shopdesk_test"

            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            access_token_expiration = 12

            [otp]
            secret = "otp-secret"
            step_seconds = 60
            window = 3

            [logger]
            level = "debug"
        "#;

        let settings: Settings = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(settings.application.name, "test-app");
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.allowed_origins.len(), 1);
        assert_eq!(settings.database.uri, "mongodb://localhost:27017");
        assert_eq!(settings.database.name, "shopdesk_test");
        assert_eq!(settings.jwt.access_token_expiration, 12);
        assert_eq!(settings.otp.step_seconds, 60);
        assert_eq!(settings.otp.window, 3);
        assert_eq!(settings.logger.level, "debug");
        assert!(settings.validate().is_ok());
    }
}
