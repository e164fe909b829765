//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Directory for uploaded product images
    pub upload_dir: String,

    /// Bootstrap admin account (created at startup if absent)
    pub admin_email: String,
    pub admin_password: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./data/bazaar.db".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // Development fallback only.
                // In production, this MUST be set via environment variable.
                "bazaar-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./data/uploads/products".to_string()),

            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@bazaar.local".to_string()),

            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "change-me-admin".to_string()),
        };

        if config.jwt_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        // No env vars required for a development configuration.
        let config = ApiConfig::load().unwrap();
        assert!(!config.database_path.is_empty());
        assert!(config.jwt_lifetime_secs > 0);
    }
}
