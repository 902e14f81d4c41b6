//! Configuration management for Keystroke Dynamics
//!
//! Configuration is a TOML file in the platform config directory. A missing
//! file means defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keystroke-dynamics/config.toml` |
//! | macOS | `~/Library/Application Support/keystroke-dynamics/config.toml` |
//! | Windows | `%APPDATA%\keystroke-dynamics\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keystroke_dynamics::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.export.endpoint = "http://metrics.local/api/save-metrics".to_string();
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const APP_DIR: &str = "keystroke-dynamics";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file, creating its directory if needed.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join(APP_DIR);

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Directory for logs and the default outbox.
///
/// Falls back to the system temp directory when the platform has no local
/// data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Metrics submission settings
    #[serde(default)]
    pub export: ExportConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Which transport delivers submitted metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// POST to `endpoint`
    #[default]
    Http,
    /// Write JSON files into `outbox_dir`
    File,
}

/// Metrics submission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub transport: TransportKind,
    /// Ingest endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Outbox directory for the file transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbox_dir: Option<PathBuf>,
    /// Clear keystrokes and text after a successful submission
    pub clear_after_submit: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Http,
            endpoint: "http://localhost:8000/api/save-metrics".to_string(),
            timeout_secs: 10,
            outbox_dir: None,
            clear_after_submit: true,
        }
    }
}

impl ExportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured outbox, or `outbox` under the data directory
    pub fn outbox_dir(&self) -> PathBuf {
        self.outbox_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("outbox"))
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// How long status messages stay visible
    pub status_duration_secs: u64,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            status_duration_secs: 3,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!(
            "keystroke-dynamics-test-{}.toml",
            std::process::id()
        ))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.export.transport, TransportKind::Http);
        assert_eq!(config.export.endpoint, "http://localhost:8000/api/save-metrics");
        assert_eq!(config.export.timeout_secs, 10);
        assert!(config.export.clear_after_submit);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn config_refresh_interval() {
        let mut config = Config::default();
        assert_eq!(config.refresh_interval().as_micros(), 16666);

        config.ui.refresh_rate_hz = 0;
        assert_eq!(config.refresh_interval().as_micros(), 1_000_000);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.export.transport = TransportKind::File;
        config.export.outbox_dir = Some(PathBuf::from("/tmp/outbox"));
        config.ui.theme = Theme::Light;
        config.save_to(&path).expect("Failed to save config");

        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded.export.transport, TransportKind::File);
        assert_eq!(loaded.export.outbox_dir(), PathBuf::from("/tmp/outbox"));
        assert_eq!(loaded.ui.theme, Theme::Light);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let result = Config::load_from(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_deserializes_partial_toml() {
        let toml_str = r#"
[export]
transport = "file"
endpoint = "http://example.test/ingest"
timeout_secs = 3
clear_after_submit = false
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.export.transport, TransportKind::File);
        assert_eq!(config.export.timeout(), Duration::from_secs(3));
        assert!(!config.export.clear_after_submit);
        assert_eq!(config.ui.refresh_rate_hz, 60);
    }

    #[test]
    fn default_outbox_lives_in_data_dir() {
        let config = ExportConfig::default();
        assert!(config.outbox_dir().starts_with(data_dir()));
        assert!(config.outbox_dir().ends_with("outbox"));
    }

    #[test]
    fn config_serializes_sections() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("transport = \"http\""));
        assert!(!toml_str.contains("outbox_dir"));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::NoConfigDir.to_string(),
            "Could not determine config directory"
        );
        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
