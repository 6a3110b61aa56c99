use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::units::UnitPreferences;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const DEFAULT_CITY: &str = "Lagos";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Lagos"
///
/// [units]
/// temperature = "celsius"
/// wind = "kmh"
/// precipitation = "mm"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    /// Used when no geolocation fix is available.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default)]
    pub units: UnitPreferences,

    /// Provider endpoint override, e.g. a proxy.
    pub base_url: Option<String>,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_city: default_city(),
            units: UnitPreferences::default(),
            base_url: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Result<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key(from_env.as_deref())
    }

    /// Blank values count as unset, so an empty variable falls through to
    /// the stored key.
    fn resolve_api_key(&self, from_env: Option<&str>) -> Result<String> {
        let non_blank = |key: &str| -> Option<String> {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_owned())
        };

        from_env
            .and_then(non_blank)
            .or_else(|| self.api_key.as_deref().and_then(non_blank))
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{TemperatureUnit, UnitSystem};

    #[test]
    fn defaults_to_lagos_and_metric() {
        let cfg = Config::default();
        assert_eq!(cfg.default_city, "Lagos");
        assert_eq!(cfg.units.fetch_system(), UnitSystem::Metric);
    }

    #[test]
    fn missing_api_key_has_hint() {
        let err = Config::default().resolve_api_key(None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("weather configure"));
    }

    #[test]
    fn environment_key_wins_over_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        assert_eq!(cfg.resolve_api_key(None).unwrap(), "STORED");
        assert_eq!(cfg.resolve_api_key(Some("FROM_ENV")).unwrap(), "FROM_ENV");
    }

    #[test]
    fn blank_environment_key_falls_back_to_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key(" STORED ".into());

        assert_eq!(cfg.resolve_api_key(Some("")).unwrap(), "STORED");
        assert_eq!(cfg.resolve_api_key(Some("   ")).unwrap(), "STORED");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.resolve_api_key(None).is_err());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("api_key = \"KEY\"\n[units]\ntemperature = \"fahrenheit\"")
            .expect("partial config parses");

        assert_eq!(cfg.default_city, "Lagos");
        assert_eq!(cfg.units.temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.base_url, None);
    }

    #[test]
    fn save_then_load_from_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.default_city = "Nairobi".into();
        cfg.save_to(&path).expect("config saves");

        let loaded = Config::load_from(&path).expect("config loads");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
