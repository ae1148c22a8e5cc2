//! Configuration management for matchcast.
//!
//! Configuration is read from `~/.config/matchcast/config.toml` (or the path
//! given with `--config`). Missing fields fall back to defaults, and the
//! `SCRAPE_URL` and `PORT` environment variables override the file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE_URL: &str = "https://mantosdofutebol.com.br/guia-de-jogos-tv-hoje-ao-vivo/";
pub const DEFAULT_CONTENT_SELECTOR: &str = "div.inner-post-entry.entry-content";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub schedule: ScheduleConfig,
    pub server: ServerConfig,
}

/// Where the schedule page lives and how to fetch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
    /// CSS selector for the region holding the listings
    pub content_selector: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: 10,
            user_agent: concat!("matchcast/", env!("CARGO_PKG_VERSION")).to_string(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Daily refresh schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA time zone name the wall-clock hour is interpreted in
    pub timezone: String,
    pub hour: u32,
    pub minute: u32,
    /// How often to log the time left until the next run (default: 3600)
    pub report_interval_secs: u64,
    /// Refresh once before serving (default: true)
    pub refresh_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            hour: 1,
            minute: 0,
            report_interval_secs: 3600,
            refresh_on_start: true,
        }
    }
}

impl ScheduleConfig {
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid(format!("unknown time zone: {}", self.timezone)))
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration, apply environment overrides and validate.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    tracing::debug!("No config at {}, using defaults", default_path.display());
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/matchcast/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("matchcast").join("config.toml"))
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SCRAPE_URL").filter(|u| !u.is_empty()) {
            self.source.url = url;
        }

        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {}", port)))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.source.url)
            .map_err(|e| ConfigError::Invalid(format!("source.url {}: {}", self.source.url, e)))?;

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be positive".into()));
        }
        if self.schedule.hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "schedule.hour out of range: {}",
                self.schedule.hour
            )));
        }
        if self.schedule.minute > 59 {
            return Err(ConfigError::Invalid(format!(
                "schedule.minute out of range: {}",
                self.schedule.minute
            )));
        }
        if self.schedule.report_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "schedule.report_interval_secs must be positive".into(),
            ));
        }

        self.schedule.tz()?;
        Ok(())
    }

    /// Write the commented default config to `path`.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        format!(
            r##"# matchcast configuration
#
# SCRAPE_URL and PORT in the environment take precedence over this file.

[source]
# Page listing the televised matches
url = "{url}"

# Request timeout in seconds
timeout_secs = 10

# CSS selector of the element holding the day / match / channel listings
content_selector = "{selector}"

[schedule]
# The page is scraped once a day at hour:minute in this time zone
timezone = "America/Sao_Paulo"
hour = 1
minute = 0

# Log the time remaining until the next scrape this often (seconds)
report_interval_secs = 3600

# Scrape once before the server starts accepting requests
refresh_on_start = true

[server]
host = "0.0.0.0"
port = 8000
"##,
            url = DEFAULT_SOURCE_URL,
            selector = DEFAULT_CONTENT_SELECTOR,
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file already exists at {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
