//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::timecode::FrameRate;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rate used to turn event timespans into frame indices.
    ///
    /// This is a deployment constant. It is never read from the project,
    /// so it must match the rate the footage was edited at.
    pub frame_rate: f64,

    /// Events whose name starts with this prefix are not materialized.
    pub skip_prefix: String,

    /// Prefix of the names the host gives to strips nobody renamed.
    pub default_name_prefix: String,

    /// Event metadata discovery.
    pub metadata: MetadataConfig,

    /// Batch render policy.
    pub render: RenderPolicy,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Where and how the event metadata file is found.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// File extension searched for beside the project document.
    pub extension: String,

    /// What to do when more than one candidate exists.
    pub resolution: MetadataResolution,
}

/// Resolution policy for multiple metadata candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetadataResolution {
    /// More than one candidate is an error.
    #[default]
    Strict,
    /// Warn and use the first candidate in lexicographic order.
    FirstMatch,
}

/// Output naming and render flag policy for batch rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPolicy {
    /// Output directory, relative to the project directory.
    pub output_subdir: String,

    /// Output container extension.
    pub extension: String,

    /// Case handling for segment names in output file names.
    pub filename_case: FilenameCase,

    /// Render only the sequencer output, bypassing the compositor.
    ///
    /// When false the project's own sequencer/compositing flags are left alone.
    pub sequencer_only: bool,
}

/// Case handling for output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilenameCase {
    #[default]
    Preserve,
    Lowercase,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "eventcut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::DEFAULT.as_f64(),
            skip_prefix: "SKIP".to_string(),
            default_name_prefix: "20".to_string(),
            metadata: MetadataConfig::default(),
            render: RenderPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            resolution: MetadataResolution::Strict,
        }
    }
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            output_subdir: "render".to_string(),
            extension: "mp4".to_string(),
            filename_case: FilenameCase::Preserve,
            sequencer_only: true,
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

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// The configured cut rate.
    pub fn frame_rate(&self) -> crate::error::EventcutResult<FrameRate> {
        FrameRate::new(self.frame_rate)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("eventcut").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = AppConfig::default();
        assert!((config.frame_rate - 59.94).abs() < 1e-9);
        assert_eq!(config.skip_prefix, "SKIP");
        assert_eq!(config.default_name_prefix, "20");
        assert_eq!(config.metadata.resolution, MetadataResolution::Strict);
        assert_eq!(config.render.output_subdir, "render");
        assert_eq!(config.render.filename_case, FilenameCase::Preserve);
        assert!(config.render.sequencer_only);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "render": { "filename_case": "lowercase" } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.render.filename_case, FilenameCase::Lowercase);
        assert_eq!(config.render.extension, "mp4");
        assert_eq!(config.skip_prefix, "SKIP");
    }

    #[test]
    fn test_load_from_falls_back_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.metadata.extension, "json");
    }

    #[test]
    fn test_load_from_reads_first_match_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "metadata": { "resolution": "first_match" } }"#).unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.metadata.resolution, MetadataResolution::FirstMatch);
    }
}
