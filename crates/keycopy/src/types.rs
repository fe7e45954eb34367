//! Core types for key distribution

use crate::error::Error;
use crate::secret::Secret;
use std::path::PathBuf;

/// A target host read from the host list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    /// Hostname or IP address
    pub name: String,
    /// 1-based line number in the host list, for diagnostics only
    pub line: usize,
}

impl Host {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// Settings shared read-only by every worker
///
/// Built once before dispatch and never mutated afterwards, so workers borrow
/// it without locking.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSettings {
    /// Remote login name
    pub username: String,
    /// Password for the credential helper (may be empty)
    pub secret: Secret,
    /// Public key to install
    pub key_path: PathBuf,
    /// Build commands but never run them
    pub dry_run: bool,
    /// Override for the `ssh-copy-id` executable
    pub copy_id_program: Option<PathBuf>,
    /// Located `sshpass` executable, if any
    pub helper_program: Option<PathBuf>,
    /// Allow the credential helper to be used when available
    pub use_helper: bool,
    /// Pass `StrictHostKeyChecking=accept-new` to ssh
    pub accept_new_host_keys: bool,
}

impl ExecutionSettings {
    /// Whether commands will be wrapped by the credential helper
    pub fn helper_active(&self) -> bool {
        self.use_helper && !self.secret.is_empty() && self.helper_program.is_some()
    }

    /// `user@host` login target
    pub fn target(&self, host: &Host) -> String {
        format!("{}@{}", self.username, host.name)
    }
}

/// Outcome of provisioning one host
#[derive(Debug)]
pub struct ExecutionResult {
    pub host: String,
    pub message: String,
    pub success: bool,
    pub error: Option<Error>,
}

impl ExecutionResult {
    pub fn success(host: &Host, message: impl Into<String>) -> Self {
        Self {
            host: host.name.clone(),
            message: message.into(),
            success: true,
            error: None,
        }
    }

    pub fn failure(host: &Host, message: impl Into<String>, error: Error) -> Self {
        Self {
            host: host.name.clone(),
            message: message.into(),
            success: false,
            error: Some(error),
        }
    }
}

/// Success/failure counts over a full result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    /// Count every result; never stops at the first failure
    pub fn from_results(results: &[ExecutionResult]) -> Self {
        let mut tally = Self::default();
        for result in results {
            tally.add_result(result);
        }
        tally
    }

    pub fn add_result(&mut self, result: &ExecutionResult) {
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Check if every host succeeded
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this tally
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}
