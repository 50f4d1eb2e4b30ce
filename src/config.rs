use std::path::PathBuf;

use directories::ProjectDirs;
use regex::Regex;
use serde::Deserialize;

use crate::metadata::{self, FieldMap, VaType};

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Directories to scan for music files (used when `scan` has no CLI args).
    pub music_dirs: Vec<PathBuf>,
    /// Extra path patterns appended behind the built-in registry.
    #[serde(rename = "patterns")]
    pub custom_patterns: Vec<CustomPatternConfig>,
}

/// A user-defined path pattern: the regex over the extension-stripped path
/// plus 1-based capture group indices for each field it extracts.
#[derive(Debug, Deserialize)]
pub struct CustomPatternConfig {
    pub pattern: String,
    #[serde(default)]
    pub artist: Option<usize>,
    #[serde(default)]
    pub album: Option<usize>,
    #[serde(default)]
    pub year: Option<usize>,
    #[serde(default)]
    pub track: Option<usize>,
    #[serde(default)]
    pub title: Option<usize>,
    #[serde(default)]
    pub compilation: Option<VaType>,
}

impl CustomPatternConfig {
    fn field_map(&self) -> FieldMap {
        FieldMap {
            artist: self.artist,
            album: self.album,
            year: self.year,
            track: self.track,
            title: self.title,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/waxtag/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Append the config's custom patterns to the default registry. A
    /// pattern that fails to compile is logged and skipped, not fatal.
    pub fn register_patterns(&self) {
        for custom in &self.custom_patterns {
            match Regex::new(&custom.pattern) {
                Ok(rgx) => metadata::add_pattern(rgx, custom.field_map(), custom.compilation),
                Err(e) => log::warn!("Skipping unparseable pattern {:?}: {}", custom.pattern, e),
            }
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
