use std::path::PathBuf;
use thiserror::Error;

/// Checks that fail before any command is built for a host
#[derive(Debug, Error)]
pub enum Preflight {
    /// No username was supplied
    #[error("username not provided")]
    MissingUsername,

    /// No public key path was configured
    #[error("ssh key path missing")]
    MissingKeyPath,

    /// The configured public key does not exist on disk
    #[error("ssh key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),
}

/// Errors that can occur while provisioning hosts.
///
/// Pre-flight errors are detected before any process is spawned; execution
/// errors come from the external tool itself.
#[derive(Debug, Error)]
pub enum Error {
    /// A pre-flight check failed
    #[error(transparent)]
    Preflight(#[from] Preflight),

    /// The external command could not be started
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external command ran but exited unsuccessfully
    #[error("{program} exited with {}", describe_exit(.code))]
    ExitStatus { program: String, code: Option<i32> },

    /// The worker pool could not be created
    #[error("failed to create worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Returns true if the error was raised before any command was attempted
    pub fn is_preflight(&self) -> bool {
        matches!(self, Error::Preflight(_))
    }

    /// Returns true if the error came from running the external command
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Launch { .. } | Error::ExitStatus { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

/// Result type for keycopy operations
pub type Result<T> = std::result::Result<T, Error>;
