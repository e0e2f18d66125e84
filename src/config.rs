//! Configuration loading.
//!
//! Settings come from an optional TOML file, the `SWAGGER_URL` environment
//! variable and the `--url` command-line flag, in increasing order of
//! precedence.
//!
//! ```toml
//! [source]
//! url = "http://localhost:3000/api-json"
//! timeout_secs = 30
//!
//! [server]
//! bind = "127.0.0.1:7340"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that selects the document URL.
pub const SOURCE_URL_ENV: &str = "SWAGGER_URL";
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:3000/api-json";
pub const DEFAULT_CONFIG_PATH: &str = "./config/apik.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the API description document comes from.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// `http(s)://` URL, `file://` URL, or a filesystem path.
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Upper bound on one HTTP fetch. Unbounded when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_secs: None,
        }
    }
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults only; used when no configuration file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(SOURCE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.source.url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            bail!("source.url must not be empty");
        }
        if self.source.timeout_secs == Some(0) {
            bail!("source.timeout_secs must be > 0");
        }
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

/// Read and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

/// Build the effective configuration.
///
/// An explicitly given file must exist. Without one, `./config/apik.toml`
/// is used when present and defaults otherwise. `SWAGGER_URL` and then
/// `url_override` are applied on top.
pub fn resolve_config(path: Option<&Path>, url_override: Option<&str>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_config(default_path)?
            } else {
                Config::minimal()
            }
        }
    };

    config.apply_env_with(|key| std::env::var(key).ok());
    if let Some(url) = url_override {
        config.source.url = url.to_string();
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.source.timeout_secs, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apik.toml");
        fs::write(&path, "[source]\ntimeout_secs = 5\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.source.timeout_secs, Some(5));
        assert_eq!(cfg.server.bind, "127.0.0.1:7340");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apik.toml");
        fs::write(&path, "[source]\ntimeout_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(resolve_config(Some(&missing), None).is_err());
    }

    #[test]
    fn test_env_override() {
        let mut cfg = Config::minimal();
        cfg.apply_env_with(|key| {
            (key == SOURCE_URL_ENV).then(|| "http://api.internal/openapi.json".to_string())
        });
        assert_eq!(cfg.source.url, "http://api.internal/openapi.json");

        // Blank values are ignored.
        let mut cfg = Config::minimal();
        cfg.apply_env_with(|_| Some("  ".to_string()));
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_flag_override_wins() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("apik.toml");
        fs::write(&path, "[source]\nurl = \"http://from-file/api-json\"\n").unwrap();

        let cfg = resolve_config(Some(&path), Some("file:///tmp/openapi.json")).unwrap();
        assert_eq!(cfg.source.url, "file:///tmp/openapi.json");
    }
}
