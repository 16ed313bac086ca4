//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LayercutError, LayercutResult};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where new projects are created by default.
    #[serde(default = "dirs_default_projects")]
    pub projects_dir: PathBuf,

    /// Timeline editing behavior.
    #[serde(default)]
    pub editor: EditorSettings,

    /// Playback and export pacing.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tunables for timeline editing and interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undo snapshots kept (oldest evicted first).
    pub history_capacity: usize,

    /// Snap distance in screen pixels; converted to seconds using the zoom.
    pub snap_threshold_px: f64,

    /// Default timeline zoom.
    pub pixels_per_second: f64,

    /// Canvas offset applied to duplicated elements (percent).
    pub duplicate_offset_percent: f64,

    /// Arrow-key nudge step (percent).
    pub nudge_step: f64,

    /// Arrow-key nudge step with modifier held (percent).
    pub nudge_step_large: f64,

    /// Drift beyond which a media element is hard-reseeked.
    pub media_resync_tolerance_secs: f64,

    /// Shortest element a trim gesture may produce.
    pub min_element_duration_secs: f64,
}

/// Playback and real-time export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Capture frame rate.
    pub fps: u32,

    /// Display refresh rate driving the playback clock.
    pub refresh_hz: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "layercut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            editor: EditorSettings::default(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            snap_threshold_px: 10.0,
            pixels_per_second: 50.0,
            duplicate_offset_percent: 5.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            media_resync_tolerance_secs: 0.3,
            min_element_duration_secs: 0.1,
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            refresh_hz: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_from(config_path: &Path) -> Self {
        match Self::read(config_path) {
            Ok(config) => config,
            Err(LayercutError::FileNotFound { .. }) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring config file; using defaults");
                Self::default()
            }
        }
    }

    /// Read and parse a config file.
    pub fn read(config_path: &Path) -> LayercutResult<Self> {
        let content = std::fs::read_to_string(config_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LayercutError::FileNotFound {
                path: config_path.to_path_buf(),
            },
            _ => LayercutError::Io(e),
        })?;
        serde_json::from_str(&content).map_err(|e| LayercutError::config(config_path, e.to_string()))
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("layercut").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("layercut").join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "projects_dir": "/tmp/layercut", "editor": { "snap_threshold_px": 4.0 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.editor.snap_threshold_px, 4.0);
        assert_eq!(config.editor.history_capacity, 50);
        assert_eq!(config.export.fps, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.projects_dir, PathBuf::from("/tmp/layercut"));

        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert!(config.projects_dir.ends_with("layercut/projects"));
    }

    #[test]
    fn test_read_distinguishes_missing_and_invalid() {
        let missing = std::env::temp_dir().join("layercut_test_missing_config.json");
        std::fs::remove_file(&missing).ok();
        assert!(matches!(
            AppConfig::read(&missing),
            Err(LayercutError::FileNotFound { .. })
        ));

        let invalid = std::env::temp_dir().join("layercut_test_invalid_config.json");
        std::fs::write(&invalid, "[1, 2]").unwrap();
        let err = AppConfig::read(&invalid).unwrap_err();
        assert!(matches!(err, LayercutError::Config { ref path, .. } if *path == invalid));
        std::fs::remove_file(&invalid).ok();
    }

    #[test]
    fn test_load_from_invalid_file_falls_back() {
        let path = std::env::temp_dir().join("layercut_test_bad_config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let config = AppConfig::load_from(&path);
        assert!((config.editor.media_resync_tolerance_secs - 0.3).abs() < 1e-9);
        std::fs::remove_file(&path).ok();
    }
}
