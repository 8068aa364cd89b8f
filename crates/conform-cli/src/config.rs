//! `conform.toml` configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "conform.toml";

/// Defaults for `conform check`; command-line flags take precedence.
///
/// ```toml
/// format = "flat"
/// full_messages = false
/// clean_attributes = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Report format: grouped, flat, detailed or constraint
    pub format: Option<String>,
    /// Prefix messages with the attribute name
    pub full_messages: Option<bool>,
    /// Drop unconstrained attributes on the async path
    pub clean_attributes: Option<bool>,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist; the default file is optional.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path).await,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if fs::try_exists(default).await.unwrap_or(false) {
                    Self::read(default).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    async fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
