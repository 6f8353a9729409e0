use anyhow::{Context, Result};
use factoryos::{Credentials, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::ConnectionArgs;

pub const DEFAULT_UI_URL: &str = "http://localhost:8081";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("factoryos"))
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("seed.toml"))
}

// ============================================================================
// Config file
// ============================================================================

/// Contents of `seed.toml`. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub ui_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Load the explicit config file, or the default one if it exists.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn discover(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            let expanded = shellexpand::tilde(path);
            return Self::load(Path::new(expanded.as_ref()));
        }

        let path = match default_config_path() {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No default config location: {e}");
                return Ok(Self::default());
            }
        };
        if path.is_file() {
            log::info!("Using config {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

// ============================================================================
// Resolved config
// ============================================================================

/// Effective connection settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub base_url: String,
    pub ui_url: String,
    pub credentials: Credentials,
    pub timeout: Option<Duration>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ui_url: DEFAULT_UI_URL.to_string(),
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
            timeout: None,
        }
    }
}

impl SeedConfig {
    /// Resolve settings from flags/env over the config file over defaults.
    pub fn load(args: &ConnectionArgs) -> Result<Self> {
        let file = FileConfig::discover(args.config.as_deref())?;
        Ok(Self::resolve(file, args))
    }

    pub fn resolve(file: FileConfig, args: &ConnectionArgs) -> Self {
        let defaults = Self::default();
        let pick = |flag: &Option<String>, file: Option<String>, default: String| {
            flag.clone().or(file).unwrap_or(default)
        };

        Self {
            base_url: trim_url(pick(&args.url, file.base_url, defaults.base_url)),
            ui_url: trim_url(pick(&args.ui_url, file.ui_url, defaults.ui_url)),
            credentials: Credentials::new(
                pick(&args.user, file.username, defaults.credentials.username),
                pick(&args.password, file.password, defaults.credentials.password),
            ),
            timeout: args
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs),
        }
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
