//! Path resolution for keyfleet
//!
//! # Environment Variables
//!
//! - `KEYFLEET_CONFIG_DIR` - Override config directory
//!
//! # Config Directory Priority
//!
//! 1. `KEYFLEET_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/keyfleet` (if set)
//! 3. `~/.config/keyfleet`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "KEYFLEET_CONFIG_DIR";

/// Public keys tried, in order, when `--ssh-key` is not given
const DEFAULT_KEYS: &[&str] = &["id_ed25519.pub", "id_rsa.pub"];

/// Get the keyfleet config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("keyfleet");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("keyfleet");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Path of the optional `config.toml`
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Host list used when neither `--vmsfile` nor the config file names one
pub fn default_hosts_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("hosts.list"))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Find a default public key under `~/.ssh`
pub fn default_key_path() -> Option<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        log::warn!("Could not determine home directory to find a default SSH key");
        return None;
    };
    let found = find_default_key(&home.join(".ssh"));
    if found.is_none() {
        log::warn!(
            "Could not find a default SSH key ({}) in ~/.ssh/",
            DEFAULT_KEYS.join(" or ")
        );
    }
    found
}

fn find_default_key(ssh_dir: &Path) -> Option<PathBuf> {
    DEFAULT_KEYS
        .iter()
        .map(|name| ssh_dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Tests
// ============================================================================
