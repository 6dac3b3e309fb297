//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.futplot/config.toml` (user)
//! 3. `/etc/futplot/config.toml` (system)
//! 4. built-in defaults
//!
//! Secrets never live in the file. The Gemini key comes from
//! `GEMINI_API_KEY`; `REDIS_URL` and `DATABASE_URL` override the
//! connection strings from the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::gemini::DEFAULT_BASE_URL;
use crate::{FutplotError, Result};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const REDIS_URL_ENV: &str = "REDIS_URL";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub prewarm: PrewarmConfig,
}

/// Model hierarchy for the fallback invoker.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Model ids in priority order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for one endpoint attempt (default: 20).
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            base_url: default_base_url(),
            attempt_timeout_secs: default_attempt_timeout(),
        }
    }
}

fn default_models() -> Vec<String> {
    ["gemini-2.5-flash-lite", "gemini-2.5-flash", "gemini-3-flash-preview"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_attempt_timeout() -> u64 {
    20
}

/// Which store backs the insight cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

/// Cache store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Redis connection string (`REDIS_URL` wins if set).
    #[serde(default)]
    pub url: Option<String>,
    /// Capacity of the in-memory store (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Coalesce concurrent misses for the same key.
    #[serde(default)]
    pub coalesce_misses: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: None,
            max_entries: default_max_entries(),
            coalesce_misses: false,
        }
    }
}

fn default_max_entries() -> u64 {
    10_000
}

/// Player database settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string (`DATABASE_URL` wins if set).
    #[serde(default)]
    pub url: Option<String>,
}

/// Prewarm routine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PrewarmConfig {
    /// How many top players to regenerate (default: 10).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Pause between generations in milliseconds (default: 1500).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Ranking metric id (default: `G+A`).
    #[serde(default = "default_ranking")]
    pub ranking: String,
}

impl Default for PrewarmConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            delay_ms: default_delay_ms(),
            ranking: default_ranking(),
        }
    }
}

impl PrewarmConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_top_n() -> usize {
    10
}

fn default_delay_ms() -> u64 {
    1500
}

fn default_ranking() -> String {
    "G+A".to_string()
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first file found is
    /// used, or the defaults if there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FutplotError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            FutplotError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(FutplotError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".futplot").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/futplot/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Gemini API key from the environment. Blank counts as absent.
    pub fn gemini_api_key() -> Option<String> {
        non_blank(std::env::var(GEMINI_API_KEY_ENV).ok())
    }

    /// Redis connection string, environment first.
    pub fn redis_url(&self) -> Option<String> {
        prefer_env(std::env::var(REDIS_URL_ENV).ok(), self.cache.url.as_deref())
    }

    /// Postgres connection string, environment first.
    pub fn database_url(&self) -> Option<String> {
        prefer_env(
            std::env::var(DATABASE_URL_ENV).ok(),
            self.database.url.as_deref(),
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn prefer_env(from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    non_blank(from_env).or_else(|| non_blank(from_file.map(str::to_string)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(
            config.generation.models,
            vec!["gemini-2.5-flash-lite", "gemini-2.5-flash", "gemini-3-flash-preview"]
        );
        assert_eq!(config.generation.attempt_timeout_secs, 20);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.max_entries, 10_000);
        assert!(!config.cache.coalesce_misses);
        assert_eq!(config.prewarm.top_n, 10);
        assert_eq!(config.prewarm.delay(), Duration::from_millis(1500));
        assert_eq!(config.prewarm.ranking, "G+A");
    }

    #[test]
    fn parse_partial_config_keeps_defaults() {
        let toml = r#"
            [cache]
            backend = "redis"
            url = "redis://cache:6379"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.cache.max_entries, 10_000);
        assert_eq!(config.generation.models.len(), 3);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [generation]
            models = ["m1", "m2"]
            base_url = "http://localhost:8080"
            attempt_timeout_secs = 10

            [cache]
            backend = "memory"
            max_entries = 500
            coalesce_misses = true

            [database]
            url = "postgres://localhost/futplot"

            [prewarm]
            top_n = 3
            delay_ms = 0
            ranking = "xg"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generation.models, vec!["m1", "m2"]);
        assert_eq!(config.generation.base_url, "http://localhost:8080");
        assert_eq!(config.generation.attempt_timeout_secs, 10);
        assert_eq!(config.cache.max_entries, 500);
        assert!(config.cache.coalesce_misses);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/futplot")
        );
        assert_eq!(config.prewarm.top_n, 3);
        assert_eq!(config.prewarm.ranking, "xg");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[cache]\nbackend = \"disk\"");
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prewarm]\ntop_n = 25").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.prewarm.top_n, 25);
    }

    #[test]
    fn load_invalid_toml_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[prewarm\ntop_n = ").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, FutplotError::Configuration(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn config_not_found_returns_error() {
        let err = Config::load(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn env_wins_over_file_unless_blank() {
        assert_eq!(
            prefer_env(Some("redis://env".into()), Some("redis://file")),
            Some("redis://env".to_string())
        );
        assert_eq!(
            prefer_env(Some("  ".into()), Some("redis://file")),
            Some("redis://file".to_string())
        );
        assert_eq!(prefer_env(None, None), None);
    }
}
