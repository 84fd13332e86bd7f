// crates/skyfire_core/src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Window settings. `width`/`height` also fix the world's aspect ratio.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skyfire".to_string(),
            width: 1600,
            height: 900,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Pace renders to the display refresh rate.
    pub vsync: bool,
    pub assets_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tick_rate: 100.0,
            vsync: true,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &Path) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::Invalid {
            path: origin.to_path_buf(),
            reason: reason.to_string(),
        };
        if !(self.tick_rate > 0.0) {
            return Err(invalid("tick_rate must be positive"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window size must be non-zero"));
        }
        Ok(())
    }

    pub fn tick(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::parse("", Path::new("skyfire.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tick(), 0.01);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let text = r#"
            vsync = false

            [window]
            width = 800
        "#;
        let config = EngineConfig::parse(text, Path::new("skyfire.toml")).unwrap();
        assert!(!config.vsync);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 900);
        assert_eq!(config.window.title, "Skyfire");
        assert_eq!(config.tick_rate, 100.0);
    }

    #[test]
    fn bad_values_are_rejected() {
        let parse = |text| EngineConfig::parse(text, Path::new("skyfire.toml"));
        assert!(matches!(parse("tick_rate = 0.0"), Err(ConfigError::Invalid { .. })));
        assert!(matches!(parse("vsync = \"yes\""), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            parse("[window]\nheight = 0"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = EngineConfig::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
