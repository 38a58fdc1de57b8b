//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! soluna-config.toml file: where the observer is (or how to find out) and
//! what the widget shows. A missing or malformed file is never fatal; the
//! defaults describe a live IP lookup with London as the last resort.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::stats::YearlyWindow;
use crate::GeoCoordinate;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "soluna-config.toml";

/// Application configuration loaded from soluna-config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Observer location and lookup settings
    pub location: LocationConfig,
    /// Display options
    pub display: DisplayConfig,
}

/// Observer location configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Fixed latitude in degrees, used when `use_fixed` is set
    pub latitude: f64,
    /// Fixed longitude in degrees
    pub longitude: f64,
    /// Label shown for the fixed location
    pub label: String,
    /// Skip the IP lookup and always use the fixed coordinates
    pub use_fixed: bool,
    /// IP geolocation endpoint returning ip-api.com style JSON
    pub lookup_url: String,
    /// How long the live lookup may take before the cache is used
    pub timeout_ms: u64,
    /// Last known location, JSON
    pub cache_path: PathBuf,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Eye height above the surrounding terrain, metres
    pub observer_height_m: f64,
    /// Include deprecated event names in JSON output
    pub show_aliases: bool,
    /// First day offset of the yearly scan (inclusive)
    pub yearly_window_start: i64,
    /// Last day offset of the yearly scan (exclusive)
    pub yearly_window_end: i64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            latitude: 51.5074,
            longitude: -0.1278,
            label: "London, England".to_string(),
            use_fixed: false,
            lookup_url: "http://ip-api.com/json/".to_string(),
            timeout_ms: 5000,
            cache_path: std::env::temp_dir().join("soluna.location.json"),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let window = YearlyWindow::default();
        DisplayConfig {
            observer_height_m: 0.0,
            show_aliases: false,
            yearly_window_start: window.start(),
            yearly_window_end: window.end(),
        }
    }
}

impl LocationConfig {
    /// The fixed coordinates, if finite.
    pub fn fixed_coordinate(&self) -> Option<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude).ok()
    }
}

impl DisplayConfig {
    /// Configured scan window; an empty or inverted range falls back to
    /// the default with a warning.
    pub fn yearly_window(&self) -> YearlyWindow {
        YearlyWindow::new(self.yearly_window_start, self.yearly_window_end).unwrap_or_else(|| {
            warn!(
                "Ignoring empty yearly window {}..{}",
                self.yearly_window_start, self.yearly_window_end
            );
            YearlyWindow::default()
        })
    }
}

impl Config {
    /// Load configuration from soluna-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.as_ref().display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration as pretty TOML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.location.label, "London, England");
        assert_eq!(config.location.timeout_ms, 5000);
        assert!(!config.location.use_fixed);
        assert_eq!(config.display.observer_height_m, 0.0);
        assert_eq!(config.display.yearly_window(), YearlyWindow::default());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "[location]\nlatitude = -33.9\nlongitude = 151.2\nuse_fixed = true\n",
        )
        .unwrap();
        let config = Config::load_from_path(file.path());
        assert!(config.location.use_fixed);
        assert_eq!(config.location.latitude, -33.9);
        assert_eq!(config.location.timeout_ms, 5000);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[location\nlatitude = ").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.display.observer_height_m = 120.0;
        config.display.show_aliases = true;
        config.save(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_inverted_window_uses_default() {
        let display = DisplayConfig {
            yearly_window_start: 10,
            yearly_window_end: 0,
            ..DisplayConfig::default()
        };
        assert_eq!(display.yearly_window(), YearlyWindow::default());
    }

    #[test]
    fn test_fixed_coordinate() {
        let mut location = LocationConfig::default();
        assert!(location.fixed_coordinate().is_some());
        location.latitude = f64::NAN;
        assert!(location.fixed_coordinate().is_none());
    }
}
