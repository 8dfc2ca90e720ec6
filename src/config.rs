//! Runtime configuration
//!
//! Loaded from `~/.registrar/config.yaml`. Every field has a default, so a
//! missing file is not an error. `REGISTRAR_BASE_URL` overrides the base URL.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_LOG_FILE, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::form::expand_home;

const CONFIG_DIR: &str = ".registrar";
const CONFIG_FILE: &str = "config.yaml";

/// On-disk configuration file
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub base_url: String,
    pub download_dir: Option<PathBuf>,
    pub log_file: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            base_url: String::from(DEFAULT_BASE_URL),
            download_dir: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Resolved configuration used by the rest of the application
#[derive(Clone, Debug)]
pub struct Config {
    /// Always ends with `/` so relative joins keep any path prefix
    pub base_url: Url,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    /// Load from the default location, applying the environment override
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        let override_url = std::env::var(BASE_URL_ENV).ok();
        Self::load_from(&path, override_url.as_deref())
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load_from(path: &Path, base_url_override: Option<&str>) -> Result<Self> {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            ConfigFile::default()
        };
        Self::resolve(file, base_url_override)
    }

    pub fn resolve(file: ConfigFile, base_url_override: Option<&str>) -> Result<Self> {
        let raw = base_url_override
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&file.base_url);
        let base_url = parse_base_url(raw)?;

        let download_dir = file
            .download_dir
            .map(expand_path)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Config {
            base_url,
            download_dir,
            log_file: expand_path(file.log_file),
            request_timeout: Duration::from_secs(file.request_timeout_secs.max(1)),
        })
    }
}

/// `~/...` resolves against the home directory
fn expand_path(path: PathBuf) -> PathBuf {
    match path.to_str() {
        Some(s) => expand_home(s),
        None => path,
    }
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&normalized).with_context(|| format!("invalid base URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("base URL must be http or https: {}", raw);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml"), None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:4000/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_file_values_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "base_url: https://api.example.com/v1\ndownload_dir: /tmp/resumes\nrequest_timeout_secs: 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path, None).unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/resumes"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let config = Config::load_from(&path, Some("http://10.0.0.2:4000")).unwrap();
        assert_eq!(config.base_url.as_str(), "http://10.0.0.2:4000/");
    }

    #[test]
    fn test_tilde_paths_expand() {
        let file = ConfigFile {
            download_dir: Some(PathBuf::from("~/resumes")),
            ..ConfigFile::default()
        };
        let config = Config::resolve(file, None).unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.download_dir, home.join("resumes"));
        }
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://files.example.com").is_err());
    }

    #[test]
    fn test_base_url_join_keeps_prefix() {
        let base = parse_base_url("https://api.example.com/v1").unwrap();
        let joined = base.join("registration/user/get-user").unwrap();
        assert_eq!(joined.as_str(), "https://api.example.com/v1/registration/user/get-user");
    }
}
