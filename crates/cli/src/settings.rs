// ABOUTME: Settings file support for the linkcard CLI.
// ABOUTME: Reads cache options and the optional CORS proxy prefix from camelCase JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use linkcard_preview::CacheOptions;
use serde::Deserialize;

/// Contents of a `--config` JSON file.
///
/// ```json
/// { "maxSize": 50, "ttlMs": 60000, "retryThreshold": 2, "corsProxyUrl": "https://proxy.example/" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(flatten)]
    pub cache: CacheOptions,
    pub cors_proxy_url: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
