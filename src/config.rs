//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub alarm: AlarmConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Alarm polling and audio configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_beep_interval")]
    pub beep_interval_secs: u64,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Ring the terminal bell while an alarm plays
    #[serde(default = "default_bell")]
    pub terminal_bell: bool,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_beep_interval() -> u64 {
    3
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_bell() -> bool {
    true
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            beep_interval_secs: default_beep_interval(),
            sample_rate: default_sample_rate(),
            terminal_bell: default_bell(),
        }
    }
}

impl AlarmConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn beep_interval(&self) -> Duration {
        Duration::from_secs(self.beep_interval_secs.max(1))
    }
}

/// Local session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("medireminder").to_string_lossy().to_string())
        .unwrap_or_else(|| "./medireminder_data".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl SessionConfig {
    /// Path of the JSON file holding the persisted session.
    /// A leading `~` in `data_dir` resolves to the home directory.
    pub fn session_file(&self) -> PathBuf {
        expand_home(&self.data_dir, dirs::home_dir()).join("session.json")
    }
}

fn expand_home(dir: &str, home: Option<PathBuf>) -> PathBuf {
    let rest = match dir.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(dir),
    };
    match home {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(dir),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("medireminder").join("config.toml")),
            Some(PathBuf::from("/etc/medireminder/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEDIREMINDER_API_URL") {
            self.api.base_url = url;
        }

        if let Some(data_dir) = lookup("MEDIREMINDER_DATA_DIR") {
            self.session.data_dir = data_dir;
        }

        if let Some(interval) = lookup("MEDIREMINDER_POLL_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.alarm.poll_interval_secs = secs;
            }
        }

        if let Some(level) = lookup("MEDIREMINDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MEDIREMINDER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MediReminder Configuration
#
# Environment variables override these settings:
# - MEDIREMINDER_API_URL
# - MEDIREMINDER_DATA_DIR
# - MEDIREMINDER_POLL_INTERVAL_SECS
# - MEDIREMINDER_LOG_LEVEL
# - MEDIREMINDER_LOG_FORMAT

[api]
# MediReminder API base URL
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[alarm]
# How often to ask the API for due alarms (seconds)
poll_interval_secs = 10

# How often the beep pattern repeats while an alarm rings (seconds)
beep_interval_secs = 3

# Sample rate used to synthesize the alarm tones
sample_rate = 44100

# Ring the terminal bell for each beep pattern
terminal_bell = true

[session]
# Directory holding the persisted session (token, user, current alarm)
data_dir = "~/.local/share/medireminder"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.alarm.poll_interval_secs, 10);
        assert_eq!(config.alarm.beep_interval_secs, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.alarm.sample_rate, 44_100);
        assert_eq!(config.session.data_dir, "~/.local/share/medireminder");
        if dirs::home_dir().is_some() {
            assert!(!config.session.session_file().starts_with("~"));
        }
    }

    #[test]
    fn test_expand_home() {
        let home = Some(PathBuf::from("/home/ana"));
        assert_eq!(
            expand_home("~/.local/share/medireminder", home.clone()),
            PathBuf::from("/home/ana/.local/share/medireminder")
        );
        assert_eq!(expand_home("~", home.clone()), PathBuf::from("/home/ana"));
        assert_eq!(expand_home("/tmp/medi", home.clone()), PathBuf::from("/tmp/medi"));
        assert_eq!(expand_home("~other/x", home), PathBuf::from("~other/x"));
        assert_eq!(expand_home("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("[api]\nbase_url = \"https://api.example.com\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.alarm.poll_interval_secs, 10);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("MEDIREMINDER_API_URL", "http://remote:9000"),
            ("MEDIREMINDER_POLL_INTERVAL_SECS", "5"),
            ("MEDIREMINDER_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://remote:9000");
        assert_eq!(config.alarm.poll_interval_secs, 5);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_interval_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| {
            (key == "MEDIREMINDER_POLL_INTERVAL_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.alarm.poll_interval_secs, 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/medireminder.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_session_file_path() {
        let session = SessionConfig {
            data_dir: "/tmp/medi".to_string(),
        };
        assert_eq!(session.session_file(), PathBuf::from("/tmp/medi/session.json"));
    }
}
