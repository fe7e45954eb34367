//! # keycopy
//!
//! Parallel distribution of a local SSH public key to many hosts.
//!
//! The actual key installation is delegated to `ssh-copy-id`, optionally
//! wrapped by `sshpass` so a password typed once can be reused for every
//! host. This crate owns everything between "here is a list of hosts" and
//! "here is one result per host":
//!
//! - **Command building**: pre-flight checks and the argument vector for a host
//! - **Execution**: running (or simulating) the command and classifying the outcome
//! - **Dispatch**: a fixed-size worker pool draining a pre-filled job queue
//! - **Summary**: tallying results into a single success/failure signal
//!
//! ## Example
//!
//! ```no_run
//! use keycopy::{ExecutionSettings, Host, SystemRunner, Tally, dispatch};
//!
//! let hosts = vec![Host::new("alpha", 1), Host::new("beta", 2)];
//! let settings = ExecutionSettings {
//!     username: "deploy".into(),
//!     key_path: "/home/deploy/.ssh/id_ed25519.pub".into(),
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let results = dispatch::run(&hosts, &settings, 4, &SystemRunner).unwrap();
//! let tally = Tally::from_results(&results);
//! assert!(tally.is_success());
//! ```
//!
//! ## Secrets
//!
//! The password lives in a [`Secret`] that is zeroed on drop. It only ever
//! leaves the container as an argument to the credential helper; every
//! loggable rendering goes through [`ProvisionCommand::redacted`].

pub mod command;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod secret;
pub mod types;

pub use command::{ProvisionCommand, Strategy};
pub use context::{Runner, SystemRunner};
pub use error::{Error, Preflight, Result};
pub use executor::{execute, provision};
pub use secret::Secret;
pub use types::{ExecutionResult, ExecutionSettings, Host, Tally};
