//! Layered configuration.
//!
//! Settings are resolved in order of precedence:
//! 1. Command-line flags (highest priority)
//! 2. Environment variables (`MARQUEE_API_URL`, `MARQUEE_PAGE_SIZE`)
//! 3. Config file (`config.toml` in the platform config directory, or the
//!    path in `MARQUEE_CONFIG`)
//! 4. Built-in defaults (lowest priority)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use marquee::ApiUrl;
use marquee::catalog::DEFAULT_PAGE_SIZE;

/// API base used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

pub const API_URL_ENV: &str = "MARQUEE_API_URL";
pub const PAGE_SIZE_ENV: &str = "MARQUEE_PAGE_SIZE";
pub const CONFIG_ENV: &str = "MARQUEE_CONFIG";

/// Effective settings for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub api_url: ApiUrl,
    pub page_size: u32,
    /// The file consulted, whether or not it exists.
    pub config_file: Option<PathBuf>,
}

/// Contents of the config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    page_size: Option<u32>,
}

impl Config {
    /// Resolve the configuration from every layer.
    pub fn load(flag_api_url: Option<&str>, flag_page_size: Option<u32>) -> Result<Self> {
        let path = Self::config_path();
        let file = match &path {
            Some(path) => load_file(path)?,
            None => FileConfig::default(),
        };

        let mut config = resolve(file, |key| std::env::var(key).ok(), flag_api_url, flag_page_size)?;
        config.config_file = path;
        debug!(api_url = %config.api_url, page_size = config.page_size, "Loaded configuration");
        Ok(config)
    }

    /// The config file location: `MARQUEE_CONFIG`, else the platform
    /// config directory.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "marquee").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
            Ok(FileConfig::default())
        }
    }
}

/// Merge the layers. `env` looks up an environment variable.
fn resolve(
    file: FileConfig,
    env: impl Fn(&str) -> Option<String>,
    flag_api_url: Option<&str>,
    flag_page_size: Option<u32>,
) -> Result<Config> {
    let api_url = match flag_api_url {
        Some(url) => url.to_string(),
        None => env(API_URL_ENV)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
    };
    let api_url = ApiUrl::new(&api_url).with_context(|| format!("Invalid API URL '{}'", api_url))?;

    let env_page_size = match env(PAGE_SIZE_ENV) {
        Some(value) => Some(
            value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid {} '{}'", PAGE_SIZE_ENV, value))?,
        ),
        None => None,
    };
    let page_size = flag_page_size
        .or(env_page_size)
        .or(file.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size == 0 {
        bail!("Page size must be at least 1");
    }

    Ok(Config {
        api_url,
        page_size,
        config_file: None,
    })
}
