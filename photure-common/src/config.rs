//! Service configuration from environment variables
//!
//! Every Photure service resolves one `Settings` value at startup.
//! Resolution priority: environment variable, then compiled default.
//! All services share one settings shape so deployments configure the
//! whole system from a single environment.

use crate::{Error, Result};
use std::path::PathBuf;

/// Default maximum upload size: 20 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Configuration shared by all Photure services
#[derive(Debug, Clone)]
pub struct Settings {
    /// Deployment environment name (shown in health responses)
    pub environment: String,
    /// Base URL of the identity verifier service
    pub auth_service_url: String,
    /// Base URL of the media store service
    pub media_service_url: String,
    /// Base URL of the gallery catalog service
    pub gallery_service_url: String,
    /// Directory the media store writes blobs into
    pub upload_dir: PathBuf,
    /// SQLite database file for the gallery catalog
    pub gallery_db_path: PathBuf,
    /// Maximum accepted upload payload in bytes
    pub max_upload_bytes: usize,
    /// Token table for the identity verifier, `token=user_id` pairs
    /// separated by commas
    pub auth_tokens: String,
    /// Bind port for the API gateway
    pub gateway_port: u16,
    /// Bind port for the identity verifier
    pub auth_port: u16,
    /// Bind port for the gallery catalog
    pub gallery_port: u16,
    /// Bind port for the media store
    pub media_port: u16,
}

impl Settings {
    /// Load settings from the process environment, falling back to
    /// compiled defaults for anything unset
    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            environment: env_or("ENVIRONMENT", "development"),
            auth_service_url: trim_base_url(env_or("AUTH_SERVICE_URL", "http://127.0.0.1:8010")),
            media_service_url: trim_base_url(env_or("MEDIA_SERVICE_URL", "http://127.0.0.1:8030")),
            gallery_service_url: trim_base_url(env_or(
                "GALLERY_SERVICE_URL",
                "http://127.0.0.1:8020",
            )),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "./data/uploads")),
            gallery_db_path: PathBuf::from(env_or("GALLERY_DB_PATH", "./data/photure.db")),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            auth_tokens: env_or("AUTH_TOKENS", ""),
            gateway_port: env_parse("GATEWAY_PORT", 8000)?,
            auth_port: env_parse("AUTH_PORT", 8010)?,
            gallery_port: env_parse("GALLERY_PORT", 8020)?,
            media_port: env_parse("MEDIA_PORT", 8030)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Service URLs are joined with absolute paths; a trailing slash would
/// produce double slashes in request URLs
fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        std::env::remove_var("MAX_UPLOAD_BYTES");
        std::env::remove_var("GATEWAY_PORT");

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(settings.gateway_port, 8000);
        assert_eq!(settings.auth_port, 8010);
        assert_eq!(settings.gallery_port, 8020);
        assert_eq!(settings.media_port, 8030);
    }

    #[test]
    #[serial]
    fn test_env_overrides_default() {
        std::env::set_var("MAX_UPLOAD_BYTES", "1024");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.max_upload_bytes, 1024);
        std::env::remove_var("MAX_UPLOAD_BYTES");
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_config_error() {
        std::env::set_var("MAX_UPLOAD_BYTES", "not-a-number");
        let result = Settings::from_env();
        assert!(matches!(result, Err(Error::Config(_))));
        std::env::remove_var("MAX_UPLOAD_BYTES");
    }

    #[test]
    #[serial]
    fn test_base_url_trailing_slash_trimmed() {
        std::env::set_var("AUTH_SERVICE_URL", "http://auth:8010/");
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.auth_service_url, "http://auth:8010");
        std::env::remove_var("AUTH_SERVICE_URL");
    }
}
