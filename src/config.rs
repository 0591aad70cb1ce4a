use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::github::DEFAULT_ENDPOINT;

pub const CONFIG_FILE: &str = ".pr-history.toml";
pub const DEFAULT_CACHE_DIR: &str = ".pr-history-cache";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-history.toml.
/// All fields are optional — the tool works with zero config and
/// command-line flags take precedence over anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub-specific settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// GraphQL endpoint, for GitHub Enterprise or testing.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Directory holding cached responses
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from .pr-history.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the GitHub token: an explicit value wins, then the config
    /// file, then the GITHUB_TOKEN env var.
    pub fn github_token(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.github.token.clone())
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.is_empty())
    }

    pub fn endpoint(&self) -> &str {
        self.github.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn cache_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.cache.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.endpoint(), "https://api.github.com/graphql");
        assert_eq!(config.cache_dir(None), PathBuf::from(".pr-history-cache"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
token = "from-file"
endpoint = "https://ghe.example.com/api/graphql"

[cache]
dir = "/tmp/pr-history"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint(), "https://ghe.example.com/api/graphql");
        assert_eq!(config.github_token(None).as_deref(), Some("from-file"));
        assert_eq!(config.cache_dir(None), PathBuf::from("/tmp/pr-history"));
    }

    #[test]
    fn test_explicit_values_win() {
        let config: Config = toml::from_str("[github]\ntoken = \"from-file\"\n[cache]\ndir = \"a\"").unwrap();
        assert_eq!(config.github_token(Some("flag")).as_deref(), Some("flag"));
        assert_eq!(config.cache_dir(Some(Path::new("b"))), PathBuf::from("b"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[cache]\ndir = \"cached\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cache_dir(None), PathBuf::from("cached"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[cache\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }
}
