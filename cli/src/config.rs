use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;

pub const DATA_DIR_VAR: &str = "NUTRISCAN_DATA_DIR";
pub const SUPABASE_URL_VAR: &str = "NUTRISCAN_SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "NUTRISCAN_SUPABASE_KEY";

pub struct Config {
    pub db_path: PathBuf,
    supabase_url: Option<String>,
    supabase_key: Option<String>,
}

/// Where the hosted food table lives.
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let data_dir = if let Some(dir) = non_empty(DATA_DIR_VAR) {
            info!(dir = %dir, "using data directory from {DATA_DIR_VAR}");
            PathBuf::from(dir)
        } else {
            let proj_dirs = ProjectDirs::from("", "", "nutriscan")
                .context("Could not determine home directory")?;
            proj_dirs.data_dir().to_path_buf()
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("nutriscan.db");

        let supabase_url = non_empty(SUPABASE_URL_VAR);
        let supabase_key = non_empty(SUPABASE_KEY_VAR);
        if supabase_url.is_none() || supabase_key.is_none() {
            info!("remote food database not configured; only local commands are available");
        }

        Ok(Config {
            db_path,
            supabase_url,
            supabase_key,
        })
    }

    /// Connection settings for commands that talk to the food database.
    pub fn remote(&self) -> Result<RemoteConfig> {
        let url = self
            .supabase_url
            .clone()
            .with_context(|| format!("{SUPABASE_URL_VAR} is not set"))?;
        let api_key = self
            .supabase_key
            .clone()
            .with_context(|| format!("{SUPABASE_KEY_VAR} is not set"))?;
        Ok(RemoteConfig {
            url: url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }
}
