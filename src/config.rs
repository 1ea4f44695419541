//! Configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where the application lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin used for share links and browser navigation
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Delays used by the UI utilities, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long a toast stays fully visible
    #[serde(default = "default_toast_display_ms")]
    pub toast_display_ms: u64,
    /// Fade-out before the toast is removed
    #[serde(default = "default_toast_fade_ms")]
    pub toast_fade_ms: u64,
    /// How long a copy target shows "Copied!"
    #[serde(default = "default_copy_feedback_ms")]
    pub copy_feedback_ms: u64,
    /// Countdown refresh period
    #[serde(default = "default_countdown_tick_ms")]
    pub countdown_tick_ms: u64,
    /// Pause between "Expired" and the redirect
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            toast_display_ms: default_toast_display_ms(),
            toast_fade_ms: default_toast_fade_ms(),
            copy_feedback_ms: default_copy_feedback_ms(),
            countdown_tick_ms: default_countdown_tick_ms(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

fn default_toast_display_ms() -> u64 {
    3000
}

fn default_toast_fade_ms() -> u64 {
    300
}

fn default_copy_feedback_ms() -> u64 {
    1500
}

fn default_countdown_tick_ms() -> u64 {
    1000
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

impl TimingConfig {
    pub fn toast_display(&self) -> Duration {
        Duration::from_millis(self.toast_display_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Never zero; `tokio::time::interval` rejects a zero period.
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms.max(1))
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Display configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// strftime pattern replacing the medium-date, short-time rendering
    #[serde(default)]
    pub date_format: Option<String>,
    /// BCP-47 locale for dates (default: the host locale)
    #[serde(default)]
    pub locale: Option<String>,
}

impl Config {
    /// Load configuration from default location.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::from_file(&config_path.to_string_lossy())
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_path(path);
        let content = std::fs::read_to_string(&expanded)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("expiry-kit")
            .join("config.toml")
    }
}

/// Expand ~ to home directory.
fn expand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app.base_url, "http://localhost:8000");
        assert_eq!(config.timing.toast_display(), Duration::from_millis(3000));
        assert_eq!(config.timing.toast_fade(), Duration::from_millis(300));
        assert_eq!(config.timing.copy_feedback(), Duration::from_millis(1500));
        assert_eq!(config.timing.countdown_tick(), Duration::from_secs(1));
        assert_eq!(config.timing.redirect_delay(), Duration::from_secs(2));
        assert!(config.display.date_format.is_none());
        assert!(config.display.locale.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[timing]\ncopy_feedback_ms = 500\n\n[app]\nbase_url = \"https://drop.example\""
        )
        .unwrap();

        let config = Config::from_file(&file.path().to_string_lossy()).unwrap();
        assert_eq!(config.timing.copy_feedback_ms, 500);
        assert_eq!(config.timing.toast_display_ms, 3000);
        assert_eq!(config.app.base_url, "https://drop.example");
        assert!(config.display.locale.is_none());
    }

    #[test]
    fn test_display_locale() {
        let config: Config = toml::from_str("[display]\nlocale = \"de-DE\"").unwrap();
        assert_eq!(config.display.locale.as_deref(), Some("de-DE"));
        assert_eq!(config.app.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let timing = TimingConfig {
            countdown_tick_ms: 0,
            ..TimingConfig::default()
        };
        assert_eq!(timing.countdown_tick(), Duration::from_millis(1));
    }

    #[test]
    fn test_expand_path_leaves_absolute_paths() {
        assert_eq!(expand_path("/etc/expiry-kit.toml"), "/etc/expiry-kit.toml");
    }
}
