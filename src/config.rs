use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cli::CopyArgs;
use crate::paths;

/// Default number of hosts processed in parallel
pub const DEFAULT_PARALLELISM: i64 = 5;

// ============================================================================
// Config File
// ============================================================================

/// Optional defaults read from `<config dir>/config.toml`
///
/// Every field can be overridden on the command line.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    /// Host list path
    pub hosts_file: Option<String>,
    /// Public key to copy
    pub ssh_key: Option<String>,
    /// Hosts processed in parallel
    pub parallelism: Option<i64>,
    /// Set to false to never use sshpass
    pub use_sshpass: Option<bool>,
    /// Pass StrictHostKeyChecking=accept-new
    pub accept_new_host_keys: Option<bool>,
    /// ssh-copy-id executable
    pub copy_id_path: Option<String>,
}

impl FleetConfig {
    /// Load the config file if present; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

// ============================================================================
// Resolved Options
// ============================================================================

/// Command line merged over the config file, paths not yet expanded
#[derive(Debug, PartialEq, Eq)]
pub struct CopyOptions {
    pub hosts_file: Option<String>,
    pub ssh_key: Option<String>,
    pub dry_run: bool,
    pub parallelism: i64,
    pub use_sshpass: bool,
    pub accept_new_host_keys: bool,
    pub copy_id_path: Option<String>,
}

impl CopyOptions {
    pub fn resolve(args: &CopyArgs, config: FleetConfig) -> Self {
        Self {
            hosts_file: args.hosts_file.clone().or(config.hosts_file),
            ssh_key: args.ssh_key.clone().or(config.ssh_key),
            dry_run: args.dry_run,
            parallelism: args
                .parallelism
                .or(config.parallelism)
                .unwrap_or(DEFAULT_PARALLELISM),
            use_sshpass: !args.no_sshpass && config.use_sshpass.unwrap_or(true),
            accept_new_host_keys: args.accept_new_host_keys
                || config.accept_new_host_keys.unwrap_or(false),
            copy_id_path: args.copy_id_path.clone().or(config.copy_id_path),
        }
    }
}
