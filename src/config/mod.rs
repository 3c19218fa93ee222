//! Configuration module for TrafficVis-RS
//!
//! This module handles:
//! - Application state persistence (UI preferences)
//! - The traffic source configuration file
//! - Runtime view and polling state (see [`settings`])
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.hxyulin.trafficvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.trafficvis-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.trafficvis-rs\`
//!
//! # Files
//!
//! - `app_state.json` - UI preferences, saved on exit
//! - `config.toml` - Traffic source selection and poll interval
//! - `logs/` - Rolling log files
//!
//! # Example
//!
//! ```toml
//! [source]
//! poll_interval_ms = 1000
//!
//! [source.kind]
//! type = "json_file"
//! path = "/tmp/traffic.json"
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, ResultExt, TrafficVisError};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.hxyulin.trafficvis-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Source configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Log directory name under the app data directory
pub const LOG_DIR: &str = "logs";

/// Default traffic poll interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Fastest supported poll interval
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Slowest supported poll interval
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        TrafficVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            TrafficVisError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Get the path to the source configuration file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== App State ====================

/// Persistent application state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            ui_preferences: UiPreferences::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            TrafficVisError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load app state from a specific file. A missing file yields defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(TrafficVisError::from)
            .context("Failed to read app state")?;

        serde_json::from_str(&content)
            .map_err(|e| TrafficVisError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TrafficVisError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| TrafficVisError::Config(format!("Failed to write app state: {}", e)))
    }
}

/// UI preferences that persist across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Font scale factor
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Interface language
    #[serde(default)]
    pub language: Language,
}

fn default_true() -> bool {
    true
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_scale: 1.0,
            language: Language::default(),
        }
    }
}

// ==================== Source Configuration ====================

/// Which traffic source the backend polls
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    /// Synthetic traffic for demos and development
    #[default]
    Mock,
    /// A JSON document holding both traffic and registry maps
    JsonFile { path: PathBuf },
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Mock => write!(f, "Mock"),
            SourceKind::JsonFile { path } => write!(f, "JSON: {}", path.display()),
        }
    }
}

/// Traffic source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub kind: SourceKind,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            kind: SourceKind::default(),
        }
    }
}

impl SourceConfig {
    /// JSON file source with the default poll interval
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::JsonFile { path: path.into() },
            ..Default::default()
        }
    }
}

/// Application configuration, stored as TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(TrafficVisError::from)
            .with_context(|| format!("Failed to read config {:?}", path))?;

        let mut config: AppConfig = toml::from_str(&content)?;
        config.source.poll_interval_ms = clamp_poll_interval(config.source.poll_interval_ms);
        Ok(config)
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {:?}, using defaults: {}", path, e);
            Self::default()
        })
    }

    /// Save configuration as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert_eq!(state.version, 1);
        assert!(state.ui_preferences.dark_mode);
        assert_eq!(state.ui_preferences.language, Language::English);
    }

    #[test]
    fn test_app_state_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_STATE_FILE);

        let mut state = AppState::default();
        state.ui_preferences.dark_mode = false;
        state.ui_preferences.language = Language::SimplifiedChinese;
        state.save_to(&path).unwrap();

        let loaded = AppState::load_from(&path).unwrap();
        assert!(!loaded.ui_preferences.dark_mode);
        assert_eq!(loaded.ui_preferences.language, Language::SimplifiedChinese);
    }

    #[test]
    fn test_app_state_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppState::load_from(dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn test_app_state_tolerates_missing_fields() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert!(state.ui_preferences.dark_mode);
        assert_eq!(state.ui_preferences.font_scale, 1.0);
    }

    #[test]
    fn test_config_parses_json_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[source]
poll_interval_ms = 2500

[source.kind]
type = "json_file"
path = "/tmp/traffic.json"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.source.poll_interval_ms, 2500);
        assert_eq!(
            config.source.kind,
            SourceKind::JsonFile {
                path: PathBuf::from("/tmp/traffic.json")
            }
        );
    }

    #[test]
    fn test_config_clamps_poll_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[source]\npoll_interval_ms = 5\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.source.poll_interval_ms, MIN_POLL_INTERVAL_MS);
        assert_eq!(config.source.kind, SourceKind::Mock);
    }

    #[test]
    fn test_config_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let config = AppConfig {
            source: SourceConfig::json_file("/var/run/traffic.json"),
        };
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_config_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[source\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, TrafficVisError::Serialization(_)));
    }
}
