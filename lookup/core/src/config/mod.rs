//! Lookup Configuration
//!
//! Registry endpoint and display settings for the lookup client.
//!
//! # Precedence
//!
//! Later layers win:
//! 1. Built-in defaults
//! 2. `config.toml`
//! 3. `BIZLOOKUP_*` environment variables
//! 4. Command line ([`ConfigOverrides`])
//!
//! # Location
//!
//! The file lives at `$XDG_CONFIG_HOME/bizlookup/config.toml`
//! (typically `~/.config/bizlookup/config.toml`).
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://registry.example/api"
//! timeout_secs = 15
//!
//! [display]
//! page_size = 10
//! notification = "timed"        # or "persistent"
//! notification_timeout_ms = 3500
//! notice = "Data is refreshed nightly."
//! notice_link = "https://registry.example/terms"
//! show_disclaimer = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_BASE_URL};
use crate::notification::{NotificationPolicy, DEFAULT_NOTIFICATION_TIMEOUT};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::state::{ReducerConfig, DEFAULT_NOTICE};

/// Environment variable for the registry base URL
pub const ENV_API_URL: &str = "BIZLOOKUP_API_URL";
/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "BIZLOOKUP_TIMEOUT_SECS";
/// Environment variable for the list page size
pub const ENV_PAGE_SIZE: &str = "BIZLOOKUP_PAGE_SIZE";
/// Environment variable for the notification mode
pub const ENV_NOTIFICATION: &str = "BIZLOOKUP_NOTIFICATION";
/// Environment variable for the notification timeout in milliseconds
pub const ENV_NOTIFICATION_MS: &str = "BIZLOOKUP_NOTIFICATION_MS";

// =============================================================================
// Error Types
// =============================================================================

/// Why a configuration could not be produced
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Cannot read {path}: {source}")]
    ReadError {
        /// File that failed
        path: PathBuf,
        /// IO failure
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`LookupToml`]
    #[error("Malformed config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range or unparseable
    #[error("Invalid setting: {0}")]
    ValidationError(String),
}

// =============================================================================
// Provenance
// =============================================================================

/// Where the effective configuration last came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Command line flags
    Cli,
    /// `BIZLOOKUP_*` variables
    Env,
    /// `config.toml`
    File,
    /// Nothing was overridden
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => f.write_str("command line"),
            Self::Env => f.write_str("environment"),
            Self::File => f.write_str("config file"),
            Self::Default => f.write_str("defaults"),
        }
    }
}

/// How the post-search notice is dismissed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Hides itself after `notification_timeout_ms`
    #[default]
    Timed,
    /// Stays until dismissed
    Persistent,
}

impl std::str::FromStr for NotificationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timed" => Ok(Self::Timed),
            "persistent" => Ok(Self::Persistent),
            other => Err(ConfigError::ValidationError(format!(
                "notification must be \"timed\" or \"persistent\", got \"{other}\""
            ))),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Registry base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds (0 = no timeout)
    pub timeout_secs: Option<u64>,
}

/// `[display]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Rows per list page
    pub page_size: Option<usize>,

    /// Notification dismissal mode
    pub notification: Option<NotificationMode>,

    /// Timed notification lifetime in milliseconds
    pub notification_timeout_ms: Option<u64>,

    /// Text of the post-search notice
    pub notice: Option<String>,

    /// Link embedded in the notice
    pub notice_link: Option<String>,

    /// Whether to render the disclaimer panel
    pub show_disclaimer: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupToml {
    /// API section
    pub api: ApiToml,

    /// Display section
    pub display: DisplayToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective configuration for the lookup client
///
/// Use [`load_config`] to build one with proper priority handling, then
/// [`LookupConfig::backend_config`] and [`LookupConfig::reducer_config`] to
/// hand the relevant parts to the core.
#[derive(Clone, Debug)]
pub struct LookupConfig {
    /// Registry base URL
    pub base_url: String,

    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,

    /// Rows per list page
    pub page_size: usize,

    /// Notification dismissal mode
    pub notification: NotificationMode,

    /// Timed notification lifetime
    pub notification_timeout: Duration,

    /// Text of the post-search notice
    pub notice: String,

    /// Link embedded in the notice
    pub notice_link: Option<String>,

    /// Whether to render the disclaimer panel
    pub show_disclaimer: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
            notification: NotificationMode::Timed,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            notice: DEFAULT_NOTICE.to_string(),
            notice_link: None,
            show_disclaimer: false,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl LookupConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Notification policy derived from mode and timeout
    #[must_use]
    pub fn notification_policy(&self) -> NotificationPolicy {
        match self.notification {
            NotificationMode::Timed => NotificationPolicy::Timed(self.notification_timeout),
            NotificationMode::Persistent => NotificationPolicy::Persistent,
        }
    }

    /// Registry connection settings
    #[must_use]
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new(self.base_url.clone()).with_timeout(self.timeout)
    }

    /// Reducer settings
    #[must_use]
    pub fn reducer_config(&self) -> ReducerConfig {
        ReducerConfig {
            page_size: self.page_size,
            notification_policy: self.notification_policy(),
            notice: self.notice.clone(),
            notice_link: self.notice_link.clone(),
        }
    }

    /// Check the effective values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a non-HTTP base URL, a zero
    /// page size, or a zero notification timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got \"{}\"",
                self.base_url
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.notification == NotificationMode::Timed && self.notification_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "notification_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/bizlookup/config.toml` or
/// `~/.config/bizlookup/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bizlookup").join("config.toml"))
}

/// Load configuration from the default path plus environment
///
/// CLI overrides are applied by the caller afterwards.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<LookupConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path plus environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the resulting values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LookupConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration, reading environment values through `env`
fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<LookupConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = LookupConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: LookupToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut LookupConfig, toml: &LookupToml) {
    if let Some(ref url) = toml.api.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = toml.api.timeout_secs {
        config.timeout = timeout_from_secs(secs);
    }

    if let Some(size) = toml.display.page_size {
        config.page_size = size;
    }
    if let Some(mode) = toml.display.notification {
        config.notification = mode;
    }
    if let Some(ms) = toml.display.notification_timeout_ms {
        config.notification_timeout = Duration::from_millis(ms);
    }
    if let Some(ref notice) = toml.display.notice {
        config.notice = notice.clone();
    }
    if toml.display.notice_link.is_some() {
        config.notice_link = toml.display.notice_link.clone();
    }
    if let Some(show) = toml.display.show_disclaimer {
        config.show_disclaimer = show;
    }
}

/// Apply environment variable overrides to the config
///
/// A variable that is set but does not parse is a
/// [`ConfigError::ValidationError`], never silently skipped.
fn apply_env_config<F>(config: &mut LookupConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL) {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = env(ENV_TIMEOUT_SECS) {
        config.timeout = timeout_from_secs(parse_env(ENV_TIMEOUT_SECS, &secs)?);
        config.source = ConfigSource::Env;
    }
    if let Some(size) = env(ENV_PAGE_SIZE) {
        config.page_size = parse_env(ENV_PAGE_SIZE, &size)?;
        config.source = ConfigSource::Env;
    }
    if let Some(mode) = env(ENV_NOTIFICATION) {
        config.notification = mode.parse()?;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env(ENV_NOTIFICATION_MS) {
        config.notification_timeout = Duration::from_millis(parse_env(ENV_NOTIFICATION_MS, &ms)?);
        config.source = ConfigSource::Env;
    }
    Ok(())
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ConfigError::ValidationError(format!("{var}=\"{value}\" is not a valid number: {e}"))
    })
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub base_url: Option<String>,

    /// Timeout override (seconds, 0 = none)
    pub timeout_secs: Option<u64>,

    /// Page size override
    pub page_size: Option<usize>,

    /// Notification mode override
    pub notification: Option<NotificationMode>,

    /// Notification timeout override (milliseconds)
    pub notification_timeout_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set page size override
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set notification mode override
    #[must_use]
    pub fn with_notification(mut self, mode: NotificationMode) -> Self {
        self.notification = Some(mode);
        self
    }

    /// Set notification timeout override
    #[must_use]
    pub fn with_notification_timeout_ms(mut self, ms: u64) -> Self {
        self.notification_timeout_ms = Some(ms);
        self
    }

    fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.timeout_secs.is_none()
            && self.page_size.is_none()
            && self.notification.is_none()
            && self.notification_timeout_ms.is_none()
    }

    /// Apply overrides to a configuration and re-validate it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override makes the
    /// configuration invalid.
    pub fn apply(&self, config: &mut LookupConfig) -> Result<(), ConfigError> {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = timeout_from_secs(secs);
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(mode) = self.notification {
            config.notification = mode;
        }
        if let Some(ms) = self.notification_timeout_ms {
            config.notification_timeout = Duration::from_millis(ms);
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Default Configuration Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.timeout.is_none());
        assert_eq!(config.page_size, 10);
        assert_eq!(
            config.notification_policy(),
            NotificationPolicy::Timed(Duration::from_millis(3500))
        );
        assert!(!config.show_disclaimer);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("bizlookup/config.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[api]
base_url = "https://registry.example/api"
timeout_secs = 15

[display]
page_size = 20
notification = "persistent"
notice = "Data is refreshed nightly."
notice_link = "https://registry.example/terms"
show_disclaimer = true
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.base_url, "https://registry.example/api");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.page_size, 20);
        assert_eq!(config.notification_policy(), NotificationPolicy::Persistent);
        assert_eq!(config.notice, "Data is refreshed nightly.");
        assert_eq!(
            config.notice_link.as_deref(),
            Some("https://registry.example/terms")
        );
        assert!(config.show_disclaimer);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let file = write_toml("[display]\npage_size = 5\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.page_size, 5);
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let file = write_toml("[api]\ntimeout_secs = 0\n");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_missing_file_graceful() {
        let config =
            load_config_with_env(Some(PathBuf::from("/nonexistent/bizlookup.toml")), no_env)
                .unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[api\nbase_url = 3\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_notification_mode_in_toml_is_parse_error() {
        let file = write_toml("[display]\nnotification = \"sometimes\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let file = write_toml("[display]\npage_size = 0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));

        let file = write_toml("[api]\nbase_url = \"ftp://registry\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    // =========================================================================
    // Priority Ordering Tests
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml(
            r#"
[api]
base_url = "https://file.example"

[display]
page_size = 20
"#,
        );
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://env.example"),
            (ENV_PAGE_SIZE, "25"),
            (ENV_NOTIFICATION, "Persistent"),
            (ENV_TIMEOUT_SECS, "0"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |key| {
            env.get(key).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.base_url, "https://env.example");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.notification, NotificationMode::Persistent);
        // Zero seconds means no timeout
        assert!(config.timeout.is_none());
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_bad_notification_env_is_validation_error() {
        let result = load_config_with_env(None, |key| {
            (key == ENV_NOTIFICATION).then(|| "never".to_string())
        });
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_numeric_env_is_validation_error() {
        for var in [ENV_TIMEOUT_SECS, ENV_PAGE_SIZE, ENV_NOTIFICATION_MS] {
            let result =
                load_config_with_env(None, |key| (key == var).then(|| "not-a-number".to_string()));
            match result {
                Err(ConfigError::ValidationError(msg)) => assert!(msg.contains(var), "{msg}"),
                other => panic!("Expected validation error for {var}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = load_config_with_env(None, |key| {
            (key == ENV_PAGE_SIZE).then(|| "25".to_string())
        })
        .unwrap();

        ConfigOverrides::new()
            .with_page_size(7)
            .with_notification_timeout_ms(1000)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.page_size, 7);
        assert_eq!(
            config.notification_policy(),
            NotificationPolicy::Timed(Duration::from_millis(1000))
        );
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = LookupConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_overrides_revalidate() {
        let mut config = LookupConfig::default();
        let result = ConfigOverrides::new()
            .with_base_url("registry.example".to_string())
            .apply(&mut config);
        assert!(result.is_err());
    }

    #[test]
    fn test_derived_configs() {
        let mut config = LookupConfig::default();
        ConfigOverrides::new()
            .with_base_url("https://registry.example".to_string())
            .with_timeout_secs(9)
            .with_notification(NotificationMode::Persistent)
            .apply(&mut config)
            .unwrap();

        let backend = config.backend_config();
        assert_eq!(backend.endpoint(), "https://registry.example/company");
        assert_eq!(backend.timeout, Some(Duration::from_secs(9)));

        let reducer = config.reducer_config();
        assert_eq!(reducer.notification_policy, NotificationPolicy::Persistent);
        assert_eq!(reducer.page_size, 10);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "command line");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "defaults");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("page_size must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid setting: page_size must be at least 1"
        );
    }
}
