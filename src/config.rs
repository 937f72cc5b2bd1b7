//! Configuration for a certwatch run.
//!
//! Two inputs are read at startup:
//!
//! * the site configuration (`sites.json`), listing the hostnames to check
//!   and the manually tracked "special" certificates with their expiry dates;
//! * the runtime settings (threshold, destination channel, chat token,
//!   logging), layered from defaults, an optional TOML file and the
//!   environment.
//!
//! # Settings Precedence
//!
//! 1. Default values (lowest priority)
//! 2. Settings file (`certwatch.toml`, or the path in `CERTWATCH_SETTINGS`)
//! 3. Environment variables, including those loaded from `.env` (highest priority)
//!
//! # Example Site Configuration
//!
//! ```json
//! {
//!     "sites": ["example.com", "shop.example.com"],
//!     "special": { "VPN appliance": "31-12-2025" }
//! }
//! ```

use crate::certificate::DEFAULT_TIMEOUT;
use crate::logging::LogLevel;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "certwatch.toml";
pub const SETTINGS_FILE_VAR: &str = "CERTWATCH_SETTINGS";

/// A manually tracked certificate whose expiry date is maintained by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialEntry {
    pub label: String,
    /// Expiry date in `DD-MM-YYYY` form, parsed at evaluation time.
    pub expiry_date: String,
}

/// Contents of `sites.json`. Both fields are mandatory, though either may be
/// empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub sites: Vec<String>,
    #[serde(deserialize_with = "ordered_special")]
    pub special: Vec<SpecialEntry>,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Number of entries a run will evaluate.
    pub fn len(&self) -> usize {
        self.sites.len() + self.special.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps the `special` mapping in document order.
fn ordered_special<'de, D>(deserializer: D) -> Result<Vec<SpecialEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SpecialVisitor;

    impl<'de> Visitor<'de> for SpecialVisitor {
        type Value = Vec<SpecialEntry>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of label to DD-MM-YYYY date")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, expiry_date)) = map.next_entry::<String, String>()? {
                entries.push(SpecialEntry { label, expiry_date });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(SpecialVisitor)
}

/// Runtime settings as read from one source.
///
/// All fields are optional to support partial configuration and merging.
/// [`Settings::resolve`] turns the merged result into a [`RunConfig`].
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    /// Expiry threshold in days
    pub interval: Option<i64>,
    /// Chat channel receiving the digests
    pub channel_id: Option<String>,
    /// Documentation page linked from the expiry digest
    pub confluence_page: Option<String>,
    /// Bot token for the chat API
    pub slack_token: Option<String>,
    /// Chat API base URL
    pub slack_api_url: Option<String>,
    /// Connection and request timeout in seconds
    pub timeout: Option<u64>,
    /// Path of the site configuration
    pub sites_file: Option<PathBuf>,
    /// Log file; logs go to stderr when unset
    pub log_file: Option<PathBuf>,
    /// DEBUG, INFO, WARNING or ERROR
    pub log_level: Option<String>,
    /// Prometheus push gateway address
    pub prometheus_address: Option<String>,
}

impl Settings {
    /// Built-in defaults for everything that has one.
    pub fn defaults() -> Self {
        Settings {
            interval: Some(30),
            slack_api_url: Some("https://slack.com/api/".to_string()),
            timeout: Some(DEFAULT_TIMEOUT.as_secs()),
            sites_file: Some(PathBuf::from("sites.json")),
            log_level: Some("INFO".to_string()),
            ..Settings::default()
        }
    }

    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value. Use `|key| std::env::var(key).ok()` for the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Settings {
            interval: get("INTERVAL")
                .map(|v| parse_number("INTERVAL", &v))
                .transpose()?,
            channel_id: get("CHANNEL_ID"),
            confluence_page: get("CONFLUENCE_PAGE"),
            slack_token: get("SLACK_BOT_TOKEN"),
            slack_api_url: get("SLACK_API_URL"),
            timeout: get("TIMEOUT")
                .map(|v| parse_number("TIMEOUT", &v))
                .transpose()?,
            sites_file: get("SITES_FILE").map(PathBuf::from),
            log_file: get("LOG_FILE").map(PathBuf::from),
            log_level: get("LOG_TYPE"),
            prometheus_address: get("PROMETHEUS_ADDRESS"),
        })
    }

    /// Merges this configuration with another, prioritizing the other's values.
    pub fn merge_with(self, other: Settings) -> Self {
        Settings {
            interval: other.interval.or(self.interval),
            channel_id: other.channel_id.or(self.channel_id),
            confluence_page: other.confluence_page.or(self.confluence_page),
            slack_token: other.slack_token.or(self.slack_token),
            slack_api_url: other.slack_api_url.or(self.slack_api_url),
            timeout: other.timeout.or(self.timeout),
            sites_file: other.sites_file.or(self.sites_file),
            log_file: other.log_file.or(self.log_file),
            log_level: other.log_level.or(self.log_level),
            prometheus_address: other.prometheus_address.or(self.prometheus_address),
        }
    }

    /// Defaults, then the settings file, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal in production.
        dotenvy::dotenv().ok();

        let file_settings = match std::env::var(SETTINGS_FILE_VAR) {
            Ok(path) => Settings::from_file(path)?,
            Err(_) if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
                Settings::from_file(DEFAULT_SETTINGS_FILE)?
            }
            Err(_) => Settings::default(),
        };
        let env_settings = Settings::from_lookup(|key| std::env::var(key).ok())?;

        Ok(Settings::defaults()
            .merge_with(file_settings)
            .merge_with(env_settings))
    }

    /// Validates the merged settings into the immutable run configuration.
    pub fn resolve(self) -> Result<RunConfig, ConfigError> {
        let threshold = required(self.interval, "interval (INTERVAL)")?;
        if threshold < 0 {
            return Err(ConfigError::Validation(format!(
                "interval must not be negative, got {}",
                threshold
            )));
        }

        let timeout = required(self.timeout, "timeout (TIMEOUT)")?;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "timeout must be at least one second".to_string(),
            ));
        }

        let confluence_page = required(self.confluence_page, "confluence_page (CONFLUENCE_PAGE)")?;
        parse_url("confluence_page", &confluence_page)?;

        let slack_api_url = required(self.slack_api_url, "slack_api_url (SLACK_API_URL)")?;
        let mut slack_api_url = parse_url("slack_api_url", &slack_api_url)?;
        // Url::join drops the last path segment unless it ends with a slash.
        if !slack_api_url.path().ends_with('/') {
            let path = format!("{}/", slack_api_url.path());
            slack_api_url.set_path(&path);
        }

        let log_level = required(self.log_level, "log_level (LOG_TYPE)")?;
        let log_level = LogLevel::from_str(&log_level)
            .map_err(|_| ConfigError::Validation(format!("unknown log level '{}'", log_level)))?;

        Ok(RunConfig {
            threshold,
            channel_id: required(self.channel_id, "channel_id (CHANNEL_ID)")?,
            confluence_page,
            slack_token: required(self.slack_token, "slack_token (SLACK_BOT_TOKEN)")?,
            slack_api_url,
            timeout: Duration::from_secs(timeout),
            sites_file: required(self.sites_file, "sites_file (SITES_FILE)")?,
            log_file: self.log_file,
            log_level,
            prometheus_address: self.prometheus_address,
        })
    }
}

/// Validated configuration, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub threshold: i64,
    pub channel_id: String,
    pub confluence_page: String,
    pub slack_token: String,
    pub slack_api_url: Url,
    pub timeout: Duration,
    pub sites_file: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: LogLevel,
    pub prometheus_address: Option<String>,
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::Validation(format!("missing required setting {}", name)))
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{} must be a whole number, got '{}'", key, value)))
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::Validation(format!("{} is not a valid URL: {}", field, e)))
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// JSON or TOML parsing error (invalid syntax, missing field, type mismatch)
    Parse(String),
    /// Validation error (missing required setting, invalid value)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
