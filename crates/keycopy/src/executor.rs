//! Per-host execution - runs (or simulates) the command and classifies the outcome

use crate::command::{self, ProvisionCommand};
use crate::context::Runner;
use crate::error::{Error, Preflight};
use crate::types::{ExecutionResult, ExecutionSettings, Host};

/// Build and execute the command for one host.
///
/// Pre-flight failures are turned into failed results; the runner is never
/// called for them.
pub fn provision<R: Runner + ?Sized>(
    host: &Host,
    settings: &ExecutionSettings,
    runner: &R,
) -> ExecutionResult {
    match command::build(host, settings) {
        Ok(cmd) => execute(host, settings, &cmd, runner),
        Err(e) => preflight_failure(host, e),
    }
}

/// Execute an already built command for one host
pub fn execute<R: Runner + ?Sized>(
    host: &Host,
    settings: &ExecutionSettings,
    cmd: &ProvisionCommand,
    runner: &R,
) -> ExecutionResult {
    let target = settings.target(host);
    let shown = cmd.redacted();

    if settings.dry_run {
        log::info!("[{}] Dry run: would execute: {}", host.name, shown);
        return ExecutionResult::success(host, format!("Dry run: Command for {target}: {shown}"));
    }

    if !settings.secret.is_empty() && !settings.helper_active() {
        log::warn!(
            "[{}] Password was provided, but sshpass is not found/enabled. \
             ssh-copy-id will attempt to use its interactive prompt.",
            host.name
        );
    }

    log::info!("[{}] Attempting: {}", host.name, shown);
    if settings.helper_active() {
        log::debug!("[{}] Using sshpass for password authentication", host.name);
    }

    match runner.run(cmd) {
        Ok(()) => {
            ExecutionResult::success(host, format!("Successfully copied SSH key to {target}"))
        }
        Err(e) => {
            log::debug!("[{}] {} failed: {}", host.name, shown, e);
            ExecutionResult::failure(host, format!("Failed to copy SSH key to {target}"), e)
        }
    }
}

fn preflight_failure(host: &Host, error: Preflight) -> ExecutionResult {
    let message = match &error {
        Preflight::MissingUsername => "Username is missing for processing.".to_string(),
        Preflight::MissingKeyPath => format!(
            "SSH key path is not configured for {} (from line {}). \
             Specify via --ssh-key or ensure a default key exists",
            host.name, host.line
        ),
        Preflight::KeyFileNotFound(path) => format!(
            "SSH key path '{}' does not exist for {} (from line {})",
            path.display(),
            host.name,
            host.line
        ),
    };
    ExecutionResult::failure(host, message, error.into())
}
