//! Process runner trait
//!
//! Lets the executor be exercised without spawning real processes.

use crate::command::{ProvisionCommand, Strategy};
use crate::error::{Error, Result};
use std::process::{Command, Stdio};

/// Runs a built provisioning command to completion
///
/// Shared across worker threads, so implementations must be `Sync`.
pub trait Runner: Send + Sync {
    /// Run the command, returning `Ok` only on a zero exit status
    fn run(&self, command: &ProvisionCommand) -> Result<()>;
}

/// Runner that spawns the real process.
///
/// stdout and stderr are inherited so `ssh-copy-id` output shows up live.
/// stdin is inherited only for the direct strategy, where `ssh-copy-id` may
/// need to prompt for a password; behind `sshpass` it is left disconnected.
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, command: &ProvisionCommand) -> Result<()> {
        let stdin = match command.strategy() {
            Strategy::Direct => Stdio::inherit(),
            Strategy::Helper => Stdio::null(),
        };

        let status = Command::new(command.program())
            .args(command.args())
            .stdin(stdin)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::Launch {
                program: command.program().to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::ExitStatus {
                program: command.program().to_string(),
                code: status.code(),
            })
        }
    }
}
