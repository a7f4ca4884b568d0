use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::logging::LogLevel;

/// How the inert profile tile presents the portrait. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStyle {
    /// Image fills the tile with name and role overlaid at the bottom.
    #[default]
    Portrait,
    /// Small circular avatar with a caption underneath.
    Avatar,
}

/// User-facing settings, loaded from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub tick_ms: u64,
    pub transition_ms: u64,
    pub fade_ms: u64,
    pub dimmed_opacity: f32,
    pub gap: u16,
    pub padding_x: u16,
    pub padding_y: u16,
    pub profile_style: ProfileStyle,
    pub truecolor: bool,
    pub log_path: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_max_bytes: u64,
    /// Also log mouse and tick events.
    pub log_input: bool,
    pub content_path: Option<PathBuf>,
    pub metrics_interval_ms: u64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            tick_ms: 33,
            transition_ms: 400,
            fade_ms: 250,
            dimmed_opacity: 0.4,
            gap: 1,
            padding_x: 4,
            padding_y: 1,
            profile_style: ProfileStyle::Portrait,
            truecolor: true,
            log_path: None,
            log_level: LogLevel::Info,
            log_max_bytes: 1024 * 1024,
            log_input: false,
            content_path: None,
            metrics_interval_ms: 0,
        }
    }
}

impl FolioConfig {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw).map_err(|source| FolioError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(FolioError::InvalidConfig("tick_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(FolioError::InvalidConfig(format!(
                "dimmed_opacity must be within 0..=1, got {}",
                self.dimmed_opacity
            )));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = FolioConfig::from_json_str(r#"{"profile_style": "avatar", "gap": 0}"#).unwrap();
        assert_eq!(config.profile_style, ProfileStyle::Avatar);
        assert_eq!(config.gap, 0);
        assert_eq!(config.transition_ms, 400);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.log_input);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FolioConfig::from_json_str(r#"{"colour": true}"#).is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = FolioConfig::default();
        config.dimmed_opacity = 1.5;
        assert!(matches!(config.validate(), Err(FolioError::InvalidConfig(_))));

        let mut config = FolioConfig::default();
        config.tick_ms = 0;
        assert!(config.validate().is_err());

        assert!(FolioConfig::default().validate().is_ok());
    }
}
