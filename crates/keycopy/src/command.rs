//! Building the `ssh-copy-id` invocation for a host

use crate::error::Preflight;
use crate::types::{ExecutionSettings, Host};
use std::fs;
use std::io::ErrorKind;
use zeroize::Zeroizing;

/// Default provisioning tool
pub const COPY_ID_PROGRAM: &str = "ssh-copy-id";

/// Credential helper looked up on `PATH`
pub const HELPER_PROGRAM: &str = "sshpass";

/// Replacement for any value following `-p` in loggable output
pub const MASK: &str = "'********'";

const ACCEPT_NEW_HOST_KEYS: &str = "StrictHostKeyChecking=accept-new";

/// How the provisioning tool gets invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `sshpass -p <secret> ssh-copy-id ...`
    Helper,
    /// `ssh-copy-id ...`, prompting on the terminal if needed
    Direct,
}

/// A fully built command line for one host.
///
/// The argument vector may contain the password, so it is zeroed on drop and
/// never printed by `Debug`. Use [`redacted`](Self::redacted) for logging.
pub struct ProvisionCommand {
    strategy: Strategy,
    argv: Zeroizing<Vec<String>>,
}

impl ProvisionCommand {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Executable to spawn (first element of argv)
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Complete argument vector including the program
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Display-safe command line with password values masked
    pub fn redacted(&self) -> String {
        let mut out = Vec::with_capacity(self.argv.len());
        let mut previous: Option<&str> = None;
        for token in self.argv.iter() {
            if previous == Some("-p") {
                out.push(MASK);
            } else {
                out.push(token.as_str());
            }
            previous = Some(token.as_str());
        }
        out.join(" ")
    }
}

impl std::fmt::Debug for ProvisionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionCommand")
            .field("strategy", &self.strategy)
            .field("command", &self.redacted())
            .finish()
    }
}

/// Build the command for `host`.
///
/// Pre-flight checks run in order and stop at the first failure: username,
/// key path configured, key file present. Nothing is spawned here.
pub fn build(
    host: &Host,
    settings: &ExecutionSettings,
) -> Result<ProvisionCommand, Preflight> {
    if settings.username.is_empty() {
        return Err(Preflight::MissingUsername);
    }
    if settings.key_path.as_os_str().is_empty() {
        return Err(Preflight::MissingKeyPath);
    }
    if let Err(e) = fs::metadata(&settings.key_path) {
        if e.kind() == ErrorKind::NotFound {
            return Err(Preflight::KeyFileNotFound(settings.key_path.clone()));
        }
    }

    let tool = settings
        .copy_id_program
        .as_ref()
        .map_or_else(|| COPY_ID_PROGRAM.to_string(), |p| p.display().to_string());

    let mut argv = Zeroizing::new(Vec::with_capacity(10));
    let strategy = match settings.helper_program.as_ref() {
        Some(helper) if settings.helper_active() => {
            argv.push(helper.display().to_string());
            argv.push("-p".to_string());
            argv.push(settings.secret.expose().to_string());
            argv.push(tool);
            Strategy::Helper
        }
        _ => {
            argv.push(tool);
            Strategy::Direct
        }
    };

    if settings.accept_new_host_keys {
        argv.push("-o".to_string());
        argv.push(ACCEPT_NEW_HOST_KEYS.to_string());
    }

    argv.push("-i".to_string());
    argv.push(settings.key_path.display().to_string());
    argv.push(settings.target(host));

    Ok(ProvisionCommand { strategy, argv })
}
