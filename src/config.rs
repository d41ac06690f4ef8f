use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::sources::SourcesLocation;
use crate::store::{DirStore, HttpStore, RowStore};

/// Storage API the dashboard reads from when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.steinhq.com/v1/storages/698b2a6baffba40a624b12de";

/// Where rows are read from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Api(String),
    Directory(PathBuf),
}

/// Settings resolved from `~/.sheetdash/rc`
///
/// The rc file holds `key=value` lines:
///
/// ```text
/// api.url=https://api.example.com/v1/storages/<id>
/// data.location=./snapshots
/// sources.location=./config.json
/// source.default=Tache du jour
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreLocation,
    pub sources: SourcesLocation,
    pub default_source: Option<String>,
}

impl Settings {
    /// Get the configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".sheetdash"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("rc"))
    }

    /// Settings with nothing configured
    pub fn defaults(config_dir: &Path) -> Self {
        Self {
            store: StoreLocation::Api(DEFAULT_API_URL.to_string()),
            sources: SourcesLocation::File(config_dir.join("config.json")),
            default_source: None,
        }
    }

    /// Load settings from the rc file, or defaults if it does not exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let config_dir = Self::config_dir()?;

        if !config_path.exists() {
            return Ok(Self::defaults(&config_dir));
        }

        let text = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Ok(Self::parse(&text, &config_dir))
    }

    /// Parse rc file contents; relative paths resolve against `config_dir`
    pub fn parse(text: &str, config_dir: &Path) -> Self {
        let mut settings = Self::defaults(config_dir);
        let mut api_url: Option<String> = None;
        let mut data_location: Option<PathBuf> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("Ignoring malformed config line: {}", line);
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "api.url" => api_url = Some(value.to_string()),
                "data.location" => data_location = Some(resolve_path(config_dir, value)),
                "sources.location" => {
                    settings.sources = match SourcesLocation::parse(value) {
                        SourcesLocation::File(_) => SourcesLocation::File(resolve_path(config_dir, value)),
                        url => url,
                    }
                }
                "source.default" => {
                    if !value.is_empty() {
                        settings.default_source = Some(value.to_string());
                    }
                }
                other => log::warn!("Unknown config key: {}", other),
            }
        }

        // A snapshot directory takes precedence over the API
        settings.store = match (data_location, api_url) {
            (Some(dir), _) => StoreLocation::Directory(dir),
            (None, Some(url)) => StoreLocation::Api(url),
            (None, None) => settings.store,
        };

        settings
    }

    /// Open the configured row store
    pub fn open_store(&self) -> Result<Box<dyn RowStore>> {
        match &self.store {
            StoreLocation::Api(url) => {
                let store = HttpStore::new(url).context("Failed to configure storage API")?;
                Ok(Box::new(store))
            }
            StoreLocation::Directory(dir) => Ok(Box::new(DirStore::new(dir.clone()))),
        }
    }
}

fn resolve_path(config_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_relative() {
        config_dir.join(path)
    } else {
        path
    }
}
