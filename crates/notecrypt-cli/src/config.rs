use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use notecrypt_core::attachment::DEFAULT_MAX_ATTACHMENT_BYTES;

use crate::cli::Cli;

/// Default session lifetime: 12 hours.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotecryptConfig {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub attachments: AttachmentSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Seconds a stored session key stays valid (0 = until logout)
    pub ttl_seconds: u64,
    /// Override for the session file location
    pub path: Option<String>,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            path: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentSection {
    pub max_bytes: usize,
}

impl Default for AttachmentSection {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_ref().filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_config_path()
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(cli: &Cli) -> anyhow::Result<NotecryptConfig> {
    let path = resolve_config_path(cli)?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(NotecryptConfig::default());
    }
    read_config(&path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<NotecryptConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("notecrypt"));
        }
    }
    Ok(home_dir()?.join(".config").join("notecrypt"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
