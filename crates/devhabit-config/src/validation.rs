//! Configuration validation.
//!
//! Every problem is collected so a misconfigured deployment fails once with
//! the full list instead of one error per restart.

use crate::AppConfig;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// JWT signing key is too short (minimum 32 bytes for HS256).
    JwtKeyTooShort { actual: usize, minimum: usize },
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Encryption key is not base64 of exactly 32 bytes.
    InvalidEncryptionKey { message: String },
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
    /// Timeout or lifetime value must be positive.
    NonPositiveTimeout { name: String, value: i64 },
    /// Password hash cost is invalid.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JwtKeyTooShort { actual, minimum } => {
                write!(f, "JWT key too short: {} bytes (minimum {})", actual, minimum)
            }
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidEncryptionKey { message } => {
                write!(f, "Invalid encryption key: {}", message)
            }
            Self::InvalidSamplingRatio { value } => {
                write!(f, "Invalid sampling ratio: {} (must be between 0.0 and 1.0)", value)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidHashCost { value, minimum, maximum } => {
                write!(
                    f,
                    "Invalid password hash cost: {} (must be between {} and {})",
                    value, minimum, maximum
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(f, "Invalid log level: '{}' (valid: trace, debug, info, warn, error)", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn require_positive(&mut self, name: &str, value: i64) {
        if value <= 0 {
            self.add_error(ConfigValidationError::NonPositiveTimeout {
                name: name.to_string(),
                value,
            });
        }
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Minimum JWT key length for HS256.
    const MIN_JWT_KEY_LENGTH: usize = 32;
    /// Required encryption key length (AES-256).
    const ENCRYPTION_KEY_LENGTH: usize = 32;
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Minimum Argon2 time cost.
    const MIN_HASH_COST: u32 = 1;
    /// Maximum Argon2 time cost.
    const MAX_HASH_COST: u32 = 10;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_jwt(&config.jwt, &mut result);
        Self::validate_security(&config.security, &mut result);
        Self::validate_encryption(&config.encryption, &mut result);
        Self::validate_server(&config.server, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_github(&config.github, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        result.into_result()
    }

    fn validate_jwt(config: &crate::JwtAuthConfig, result: &mut ValidationResult) {
        if config.key.len() < Self::MIN_JWT_KEY_LENGTH {
            result.add_error(ConfigValidationError::JwtKeyTooShort {
                actual: config.key.len(),
                minimum: Self::MIN_JWT_KEY_LENGTH,
            });
        }
        result.require_positive("jwt.expiration_in_minutes", config.expiration_in_minutes);
        result.require_positive(
            "jwt.refresh_token_expiration_in_days",
            config.refresh_token_expiration_in_days,
        );
    }

    fn validate_security(config: &crate::SecurityConfig, result: &mut ValidationResult) {
        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&config.password_hash_cost) {
            result.add_error(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }
    }

    fn validate_encryption(config: &crate::EncryptionConfig, result: &mut ValidationResult) {
        match STANDARD.decode(config.key.trim()) {
            Ok(bytes) if bytes.len() == Self::ENCRYPTION_KEY_LENGTH => {}
            Ok(bytes) => result.add_error(ConfigValidationError::InvalidEncryptionKey {
                message: format!("expected {} bytes, got {}", Self::ENCRYPTION_KEY_LENGTH, bytes.len()),
            }),
            Err(e) => result.add_error(ConfigValidationError::InvalidEncryptionKey {
                message: e.to_string(),
            }),
        }
    }

    fn validate_server(config: &crate::ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        result.require_positive("server.request_timeout_secs", saturating_i64(config.request_timeout_secs));

        if let Some(ref base_url) = config.public_base_url {
            if Url::parse(base_url).is_err() {
                result.add_error(ConfigValidationError::InvalidUrl {
                    url_type: "public_base_url".to_string(),
                    message: format!("Invalid URL format: {}", base_url),
                });
            }
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, result: &mut ValidationResult) {
        if config.url.is_empty() {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("postgres://") && !config.url.starts_with("postgresql://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with postgres:// or postgresql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        result.require_positive("database.connect_timeout_secs", saturating_i64(config.connect_timeout_secs));
        result.require_positive("database.idle_timeout_secs", saturating_i64(config.idle_timeout_secs));
    }

    fn validate_github(config: &crate::GitHubConfig, result: &mut ValidationResult) {
        if Url::parse(&config.base_url).is_err() {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "github.base_url".to_string(),
                message: format!("Invalid URL format: {}", config.base_url),
            });
        }
        result.require_positive("github.timeout_secs", saturating_i64(config.timeout_secs));
    }

    fn validate_observability(config: &crate::ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if !(0.0..=1.0).contains(&config.sampling_ratio) {
            result.add_error(ConfigValidationError::InvalidSamplingRatio {
                value: config.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = config.otlp_endpoint {
            if Url::parse(endpoint).is_err() {
                result.add_error(ConfigValidationError::InvalidUrl {
                    url_type: "otlp_endpoint".to_string(),
                    message: format!("Invalid URL format: {}", endpoint),
                });
            }
        }
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.jwt.key = "k".repeat(32);
        config
    }

    fn errors_of(config: &AppConfig) -> Vec<ConfigValidationError> {
        ConfigValidator::validate(config).unwrap_err()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(ConfigValidator::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_jwt_key_too_short() {
        let mut config = valid_config();
        config.jwt.key = "short".to_string();

        assert!(errors_of(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::JwtKeyTooShort { actual: 5, .. })));
    }

    #[test]
    fn test_invalid_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(errors_of(&config).iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidPort { name, .. } if name == "server.port"
        )));
    }

    #[test]
    fn test_invalid_pool_size() {
        let mut config = valid_config();
        config.database.min_connections = 100;
        config.database.max_connections = 10;

        assert!(errors_of(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidPoolSize { .. })));
    }

    #[test]
    fn test_non_postgres_url_rejected() {
        let mut config = valid_config();
        config.database.url = "mysql://localhost/devhabit".to_string();

        assert!(errors_of(&config).iter().any(|e| matches!(
            e,
            ConfigValidationError::InvalidUrl { url_type, .. } if url_type == "database"
        )));
    }

    #[test]
    fn test_encryption_key_length() {
        let mut config = valid_config();
        config.encryption.key = STANDARD.encode([1u8; 16]);
        assert!(errors_of(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidEncryptionKey { .. })));

        config.encryption.key = "not base64!".to_string();
        assert!(errors_of(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidEncryptionKey { .. })));
    }

    #[test]
    fn test_non_positive_lifetimes() {
        let mut config = valid_config();
        config.jwt.expiration_in_minutes = 0;
        config.jwt.refresh_token_expiration_in_days = -1;

        let errors = errors_of(&config);
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ConfigValidationError::NonPositiveTimeout { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_observability_checks() {
        let mut config = valid_config();
        config.observability.log_level = "verbose".to_string();
        config.observability.sampling_ratio = 1.5;
        config.observability.otlp_endpoint = Some("not a url".to_string());

        let errors = errors_of(&config);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.jwt.key = String::new();
        config.server.port = 0;
        config.github.base_url = "::".to_string();

        assert_eq!(errors_of(&config).len(), 3);
    }

    #[test]
    fn test_format_validation_errors() {
        let formatted = format_validation_errors(&[ConfigValidationError::InvalidLogLevel {
            value: "loud".to_string(),
        }]);
        assert!(formatted.starts_with("Configuration validation failed:"));
        assert!(formatted.contains("1. Invalid log level: 'loud'"));
    }
}
