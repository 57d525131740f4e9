//! Configuration management for the gateway
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GatewayError;
use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "travelgate.toml";

/// Dotenv file read from the working directory at startup
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Secret variable names from earlier deployments, mapped onto config keys
const LEGACY_PIXABAY_KEY: &str = "pixabayAPI_KEY";
const LEGACY_GEONAMES_USER: &str = "geoNamesAPI_ID";
const LEGACY_WEATHERBIT_KEY: &str = "weatherbitAPI_KEY";

/// Root configuration structure for the gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Inbound HTTP server settings
    pub server: ServerConfig,
    /// Image search provider
    pub pixabay: PixabayConfig,
    /// Geocoding provider
    pub geonames: GeoNamesConfig,
    /// Weather provider
    pub weatherbit: WeatherbitConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the prebuilt front-end bundle
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PixabayConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoNamesConfig {
    /// GeoNames authenticates with an account name instead of a key
    pub username: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherbitConfig {
    pub api_key: String,
    /// Versioned API root; `/current` and `/normals` are appended
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Outbound request timeout in seconds, 0 disables it
    pub timeout_seconds: u32,
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Export the variables of a dotenv file into the process environment.
///
/// Variables that are already set win. Returns `Ok(false)` when the file
/// does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

// Default value functions
fn default_pixabay_base_url() -> String {
    "https://pixabay.com/api/".to_string()
}

fn default_geonames_base_url() -> String {
    "http://api.geonames.org/searchJSON".to_string()
}

fn default_weatherbit_base_url() -> String {
    "https://api.weatherbit.io/v2.0".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("travelgate/{}", crate::VERSION)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "dist".to_string(),
        }
    }
}

impl Default for PixabayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_pixabay_base_url(),
        }
    }
}

impl Default for GeoNamesConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            base_url: default_geonames_base_url(),
        }
    }
}

impl Default for WeatherbitConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weatherbit_base_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Load configuration reading variables from `env` instead of the
    /// process environment when it is given.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELGATE_PIXABAY__API_KEY.
        // Values stay strings so numeric-looking secrets are kept verbatim.
        builder = builder.add_source(
            Environment::with_prefix("TRAVELGATE")
                .prefix_separator("_")
                .separator("__")
                .source(env.clone()),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: GatewayConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_secrets(|name| match &env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        });
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Fill still-empty secrets from the legacy environment variables
    pub fn apply_legacy_secrets<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.pixabay.api_key.is_empty()
            && let Some(key) = lookup(LEGACY_PIXABAY_KEY)
        {
            self.pixabay.api_key = key;
        }
        if self.geonames.username.is_empty()
            && let Some(user) = lookup(LEGACY_GEONAMES_USER)
        {
            self.geonames.username = user;
        }
        if self.weatherbit.api_key.is_empty()
            && let Some(key) = lookup(LEGACY_WEATHERBIT_KEY)
        {
            self.weatherbit.api_key = key;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.pixabay.base_url.is_empty() {
            self.pixabay.base_url = default_pixabay_base_url();
        }
        if self.geonames.base_url.is_empty() {
            self.geonames.base_url = default_geonames_base_url();
        }
        if self.weatherbit.base_url.is_empty() {
            self.weatherbit.base_url = default_weatherbit_base_url();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    ///
    /// Provider secrets are not checked; a missing key surfaces as an
    /// upstream error on the first call.
    pub fn validate(&self) -> std::result::Result<(), GatewayError> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> std::result::Result<(), GatewayError> {
        if self.http.timeout_seconds > 300 {
            return Err(GatewayError::config(
                "Outbound HTTP timeout cannot exceed 300 seconds",
            ));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> std::result::Result<(), GatewayError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GatewayError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (provider, url) in [
            ("pixabay", &self.pixabay.base_url),
            ("geonames", &self.geonames.base_url),
            ("weatherbit", &self.weatherbit.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GatewayError::config(format!(
                    "{provider} base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.pixabay.base_url, "https://pixabay.com/api/");
        assert_eq!(config.geonames.base_url, "http://api.geonames.org/searchJSON");
        assert_eq!(config.weatherbit.base_url, "https://api.weatherbit.io/v2.0");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.pixabay.api_key.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secrets_are_not_validated() {
        let config = GatewayConfig::default();
        assert!(config.geonames.username.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = GatewayConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = GatewayConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[rstest]
    #[case("ftp://pixabay.com/api/")]
    #[case("pixabay.com/api/")]
    fn test_config_validation_base_url(#[case] url: &str) {
        let mut config = GatewayConfig::default();
        config.pixabay.base_url = url.to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("pixabay base URL"));
    }

    #[test]
    fn test_legacy_secrets_fill_empty_keys_only() {
        let legacy = HashMap::from([
            ("pixabayAPI_KEY", "pix-legacy"),
            ("geoNamesAPI_ID", "geo-legacy"),
            ("weatherbitAPI_KEY", "wb-legacy"),
        ]);

        let mut config = GatewayConfig::default();
        config.weatherbit.api_key = "wb-configured".to_string();
        config.apply_legacy_secrets(|name| legacy.get(name).map(|v| v.to_string()));

        assert_eq!(config.pixabay.api_key, "pix-legacy");
        assert_eq!(config.geonames.username, "geo-legacy");
        assert_eq!(config.weatherbit.api_key, "wb-configured");
    }

    #[test]
    fn test_apply_defaults_restores_blank_values() {
        let mut config = GatewayConfig::default();
        config.weatherbit.base_url.clear();
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.weatherbit.base_url, "https://api.weatherbit.io/v2.0");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("travelgate-test-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\n\n[geonames]\nusername = \"demo\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = GatewayConfig::load_with_env(Some(path.clone()), Some(Map::new())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.geonames.username, "demo");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.pixabay.base_url, "https://pixabay.com/api/");
    }

    #[test]
    fn test_numeric_looking_secrets_are_kept_verbatim() {
        let env = Map::from([
            ("TRAVELGATE_GEONAMES__USERNAME".to_string(), "007".to_string()),
            (
                "TRAVELGATE_WEATHERBIT__API_KEY".to_string(),
                "12345678901234567890123456789e01".to_string(),
            ),
            ("TRAVELGATE_SERVER__PORT".to_string(), "8088".to_string()),
            ("TRAVELGATE_HTTP__TIMEOUT_SECONDS".to_string(), "12".to_string()),
        ]);

        let missing = std::env::temp_dir().join("travelgate-no-such-config.toml");
        let config = GatewayConfig::load_with_env(Some(missing), Some(env)).unwrap();

        assert_eq!(config.geonames.username, "007");
        assert_eq!(config.weatherbit.api_key, "12345678901234567890123456789e01");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.http.timeout_seconds, 12);
    }

    #[test]
    fn test_env_file_exports_variables() {
        let path = std::env::temp_dir().join(format!("travelgate-test-{}.env", std::process::id()));
        std::fs::write(&path, "TRAVELGATE_ENV_FILE_TEST_KEY=0042\n").unwrap();

        let loaded = load_env_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(loaded);
        assert_eq!(
            std::env::var("TRAVELGATE_ENV_FILE_TEST_KEY").unwrap(),
            "0042"
        );
    }

    #[test]
    fn test_missing_env_file_is_skipped() {
        let path = std::env::temp_dir().join("travelgate-no-such-file.env");
        assert!(!load_env_file(&path).unwrap());
    }

    #[test]
    fn test_legacy_secrets_read_from_env_source() {
        let env = Map::from([("pixabayAPI_KEY".to_string(), "0042".to_string())]);

        let missing = std::env::temp_dir().join("travelgate-no-such-config.toml");
        let config = GatewayConfig::load_with_env(Some(missing), Some(env)).unwrap();

        assert_eq!(config.pixabay.api_key, "0042");
    }
}
