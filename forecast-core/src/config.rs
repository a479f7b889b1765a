use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Upper bound of forecast days the provider serves.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Upper bound of the `show --watch` interval: one day.
pub const MAX_REFRESH_MINUTES: u64 = 24 * 60;

/// Which endpoints a fetch hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// One request to `forecast.json`.
    #[default]
    Combined,
    /// `current.json` and `forecast.json` side by side.
    Split,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Combined => "combined",
            FetchMode::Split => "split",
        }
    }

    pub const fn all() -> &'static [FetchMode] {
        &[FetchMode::Combined, FetchMode::Split]
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// days = 3
/// fetch_mode = "combined"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WeatherAPI.com key; `WEATHERAPI_KEY` takes precedence when set.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Forecast days requested by default.
    pub days: u8,
    pub fetch_mode: FetchMode,
    /// Interval for `show --watch`.
    pub refresh_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            days: 3,
            fetch_mode: FetchMode::Combined,
            refresh_minutes: 5,
        }
    }
}

impl Config {
    /// Resolve the API key, preferring the environment over the file.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_env(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with_env(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `forecast configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes.max(1).saturating_mul(60))
    }

    /// Reject values the provider or the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_FORECAST_DAYS).contains(&self.days) {
            bail!("Invalid days = {}: must be between 1 and {MAX_FORECAST_DAYS}.", self.days);
        }
        if self.timeout_secs == 0 {
            bail!("Invalid timeout_secs = 0: must be at least 1 second.");
        }
        if !(1..=MAX_REFRESH_MINUTES).contains(&self.refresh_minutes) {
            bail!(
                "Invalid refresh_minutes = {}: must be between 1 and {MAX_REFRESH_MINUTES}.",
                self.refresh_minutes
            );
        }
        if self.base_url.trim().is_empty() {
            bail!("Invalid base_url: must not be empty.");
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
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
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "forecast", "forecast-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_usage() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.days, 3);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.fetch_mode, FetchMode::Combined);
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(300));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key_with_env(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `forecast configure`"));
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let cfg = Config { api_key: Some("FILE_KEY".into()), ..Config::default() };

        assert_eq!(cfg.api_key_with_env(None).unwrap(), "FILE_KEY");
        assert_eq!(cfg.api_key_with_env(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
        assert_eq!(cfg.api_key_with_env(Some("  ".into())).unwrap(), "FILE_KEY");
    }

    #[test]
    fn validate_rejects_out_of_range_days() {
        let cfg = Config { days: 0, ..Config::default() };
        assert!(cfg.validate().is_err());

        let cfg = Config { days: MAX_FORECAST_DAYS + 1, ..Config::default() };
        assert!(cfg.validate().unwrap_err().to_string().contains("Invalid days"));
    }

    #[test]
    fn validate_rejects_out_of_range_refresh_minutes() {
        let cfg: Config = toml::from_str("refresh_minutes = 9223372036854775807").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid refresh_minutes"));
        // Computing the interval must not overflow even for unvalidated values.
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(u64::MAX));

        let cfg = Config { refresh_minutes: 0, ..Config::default() };
        assert!(cfg.validate().is_err());

        let cfg = Config { refresh_minutes: MAX_REFRESH_MINUTES, ..Config::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_rejects_huge_refresh_minutes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "refresh_minutes = 9223372036854775807\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid refresh_minutes"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: Config = toml::from_str("api_key = \"K\"\nfetch_mode = \"split\"\n").unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("K"));
        assert_eq!(cfg.fetch_mode, FetchMode::Split);
        assert_eq!(cfg.days, 3);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            days: 2,
            fetch_mode: FetchMode::Split,
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
