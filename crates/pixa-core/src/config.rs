//! Configuration module
//!
//! This module provides the application configuration, loaded from environment
//! variables (with `.env` support) and validated before the service starts.

use std::env;

// Common constants
const SERVER_PORT: u16 = 8082;
const MAX_FILE_SIZE_MB: usize = 5;
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Application configuration.
///
/// Every field comes from the environment with a sensible default, so the
/// service runs locally with no `.env` at all.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub upload_dir: String,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub cors_origins: Vec<String>,
    // Service registry (Eureka)
    pub app_name: String,
    pub eureka_enabled: bool,
    pub eureka_server: String,
    pub instance_host: String,
    pub heartbeat_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "jpg,jpeg,png,webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid port number"))?,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions,
            allowed_content_types,
            cors_origins,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "image-service".to_string()),
            eureka_enabled: env::var("EUREKA_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            eureka_server: env::var("EUREKA_SERVER")
                .unwrap_or_else(|_| "http://localhost:8761/eureka".to_string()),
            instance_host: env::var("INSTANCE_HOST")
                .unwrap_or_else(|_| "host.docker.internal".to_string()),
            heartbeat_interval_secs: env::var("EUREKA_HEARTBEAT_INTERVAL_SECS")
                .unwrap_or_else(|_| HEARTBEAT_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(HEARTBEAT_INTERVAL_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be non-zero"));
        }

        if self.upload_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be at least 1"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES must not be empty"));
        }

        if self.eureka_enabled {
            if self.eureka_server.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "EUREKA_SERVER must be set when EUREKA_ENABLED=true"
                ));
            }
            if self.app_name.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "APP_NAME must be set when EUREKA_ENABLED=true"
                ));
            }
            if self.instance_host.trim().is_empty() {
                return Err(anyhow::anyhow!(
                    "INSTANCE_HOST must be set when EUREKA_ENABLED=true"
                ));
            }
            if self.heartbeat_interval_secs == 0 {
                return Err(anyhow::anyhow!(
                    "EUREKA_HEARTBEAT_INTERVAL_SECS must be at least 1"
                ));
            }
        }

        Ok(())
    }
}
