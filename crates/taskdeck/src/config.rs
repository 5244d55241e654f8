use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

const CONFIG_DIR: &str = "taskdeck";
const CONFIG_FILE: &str = "config.toml";

/// Remote store credentials loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// REST root of the store, e.g. `https://example.supabase.co/rest/v1`.
    pub base_url: String,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Owner id every task and tag is scoped to.
    pub user_id: String,
}

impl StoreConfig {
    /// Load configuration from `explicit` or the default user config path.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };
        Self::from_file(&path)
    }

    /// Load and validate configuration from a known file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }
        if self.user_id.trim().is_empty() {
            bail!("user_id must not be empty");
        }
        Ok(())
    }
}

fn default_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or_else(|| anyhow!("could not determine the user config directory"))
}
