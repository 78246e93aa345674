//! Configuration management for liftmenu.
//!
//! Settings come from a TOML file, then the process environment (secrets
//! and addresses), then command-line flags. Secrets are never read from or
//! written to the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::progression::ReferenceSet;
use super::secret::SecretValue;
use super::units::{WeightUnit, MAX_PRECISION};

/// Environment variable holding the Hevy API key.
pub const ENV_API_KEY: &str = "HEVY_API_KEY";
/// Environment variable overriding the Hevy API base URL.
pub const ENV_API_URL: &str = "HEVY_API_URL";
/// Environment variable holding the sender address (also the SMTP login).
pub const ENV_EMAIL_SENDER: &str = "EMAIL_SENDER";
/// Environment variable holding the SMTP password.
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
/// Environment variable holding the recipient address.
pub const ENV_EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".liftmenu.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hevy API settings
    pub api: ApiConfig,

    /// Pagination policy
    pub fetch: FetchConfig,

    /// Recommendation rule settings
    pub progression: ProgressionConfig,

    /// Email delivery settings
    pub email: EmailConfig,
}

/// Hevy API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL
    pub base_url: String,

    /// Workouts per page
    pub page_size: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// API key (environment only)
    #[serde(skip)]
    pub api_key: Option<SecretValue>,
}

/// Which pagination policy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// A fixed number of pages
    #[default]
    Pages,
    /// Everything inside a rolling window of days
    Window,
}

/// Pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Policy selector
    pub mode: FetchMode,

    /// Page cap for [`FetchMode::Pages`]
    pub max_pages: u32,

    /// Window length for [`FetchMode::Window`]
    pub window_days: u32,

    /// Page cap for [`FetchMode::Window`]
    pub window_max_pages: u32,
}

/// Recommendation rule settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Display unit
    pub unit: WeightUnit,

    /// Weight added on INCREASE WEIGHT, in the display unit (defaults per unit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<f64>,

    /// Rep goal before adding weight
    pub goal_reps: u32,

    /// Highest RPE at which the goal still counts as passed
    pub rpe_trigger: f64,

    /// Which set the recommendation is based on
    pub reference_set: ReferenceSet,

    /// Decimal places for displayed weights (0 to 2)
    pub display_precision: u32,
}

impl ProgressionConfig {
    /// Increment in the display unit.
    pub fn increment(&self) -> f64 {
        self.increment.filter(|i| i.is_finite() && *i > 0.0).unwrap_or_else(|| self.unit.default_increment())
    }

    /// Display precision, clamped to what the formatter supports.
    pub fn precision(&self) -> u32 {
        self.display_precision.min(MAX_PRECISION)
    }
}

/// Email delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP submission host
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    pub smtp_port: u16,

    /// Subject override; templated when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Sender address, also used as the SMTP login
    #[serde(skip)]
    pub sender: Option<String>,

    /// Recipient address
    #[serde(skip)]
    pub receiver: Option<String>,

    /// SMTP password (environment only)
    #[serde(skip)]
    pub password: Option<SecretValue>,
}

impl Config {
    /// Load configuration from file.
    ///
    /// Looks for config in:
    /// 1. `.liftmenu.toml` in current directory
    /// 2. `~/.config/liftmenu/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        // Try local config first
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Path of the config file `load` would read, if any.
    pub fn resolved_path() -> Option<PathBuf> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }
        Self::global_config_path().filter(|p| p.exists())
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("liftmenu").join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides using a custom lookup (used by tests).
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = SecretValue::non_empty(lookup(ENV_API_KEY)) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(sender) = non_empty(ENV_EMAIL_SENDER) {
            self.email.sender = Some(sender);
        }
        if let Some(receiver) = non_empty(ENV_EMAIL_RECEIVER) {
            self.email.receiver = Some(receiver);
        }
        if let Some(password) = SecretValue::non_empty(lookup(ENV_EMAIL_PASSWORD)) {
            self.email.password = Some(password);
        }
    }

    /// Render the effective configuration as TOML (secrets excluded).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hevyapp.com/v1".to_string(),
            page_size: 10,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { mode: FetchMode::Pages, max_pages: 3, window_days: 7, window_max_pages: 20 }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            unit: WeightUnit::Pounds,
            increment: None,
            goal_reps: 12,
            rpe_trigger: 9.0,
            reference_set: ReferenceSet::Last,
            display_precision: 1,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            subject: None,
            sender: None,
            receiver: None,
            password: None,
        }
    }
}
