use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::progress::MIN_PROGRESS_INTERVAL;
use crate::core::region_query::DEFAULT_DISPLAY_LIMIT;
use crate::renderer::grid::DEFAULT_GRID_COLUMNS;

const CONFIG_DIR: &str = "pixel-roll-call";
const CONFIG_FILE: &str = "config.json";

/// User settings. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Columns of the ASCII grids
    pub grid_columns: usize,
    /// Coordinates listed for an unbounded search
    pub display_limit: usize,
    /// Colors with at most this many pixels list them in the scan summary
    pub summary_coordinate_limit: usize,
    pub progress_interval_ms: u64,
    /// Scan without progress display
    pub low_power: bool,
    pub image_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_columns: DEFAULT_GRID_COLUMNS,
            display_limit: DEFAULT_DISPLAY_LIMIT,
            summary_coordinate_limit: 10,
            progress_interval_ms: 1000,
            low_power: false,
            image_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// `dirs::config_dir()/pixel-roll-call/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path (which must exist) or from the default
    /// location when present. Falls back to defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config = Self::from_json(&text).with_context(|| format!("Invalid config {:?}", path))?;
        log::debug!("loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_columns == 0 {
            bail!("grid_columns must be at least 1");
        }
        if self.progress_interval() < MIN_PROGRESS_INTERVAL {
            bail!(
                "progress_interval_ms must be at least {}, got {}",
                MIN_PROGRESS_INTERVAL.as_millis(),
                self.progress_interval_ms
            );
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Where export prompts start: configured dir, else the documents folder,
    /// else the working directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn image_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .or_else(dirs::picture_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{"grid_columns": 64, "low_power": true}"#).unwrap();
        assert_eq!(config.grid_columns, 64);
        assert!(config.low_power);
        assert_eq!(config.display_limit, 50);
        assert_eq!(config.progress_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(Config::from_json(r#"{"grid_columns": 0}"#).is_err());
    }

    #[test]
    fn test_sub_second_progress_interval_rejected() {
        assert!(Config::from_json(r#"{"progress_interval_ms": 0}"#).is_err());
        assert!(Config::from_json(r#"{"progress_interval_ms": 999}"#).is_err());
        let config = Config::from_json(r#"{"progress_interval_ms": 2500}"#).unwrap();
        assert_eq!(config.progress_interval(), Duration::from_millis(2500));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"display_limit": 5, "export_dir": "/tmp/out"}"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/out"));
    }
}
