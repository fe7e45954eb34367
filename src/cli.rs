use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "keyfleet")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Copy an SSH public key to a list of hosts in parallel", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub copy: CopyArgs,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Copy
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct CopyArgs {
    /// File listing hostnames or IPs, one per line [default: <config dir>/hosts.list]
    #[arg(short = 'f', long = "vmsfile", value_name = "PATH", env = "KEYFLEET_HOSTS_FILE")]
    pub hosts_file: Option<String>,

    /// Username for connecting to all hosts (required)
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH public key to copy (overrides default key discovery)
    #[arg(short = 'k', long = "ssh-key", value_name = "PATH")]
    pub ssh_key: Option<String>,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of hosts to process in parallel (0 or 1 for sequential) [default: 5]
    #[arg(short = 'j', long, allow_negative_numbers = true)]
    pub parallelism: Option<i64>,

    /// Accept unknown host keys (StrictHostKeyChecking=accept-new)
    #[arg(long)]
    pub accept_new_host_keys: bool,

    /// Never use sshpass, even when it is installed
    #[arg(long)]
    pub no_sshpass: bool,

    /// Path to the ssh-copy-id executable
    #[arg(long, value_name = "PATH")]
    pub copy_id_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_copy_flags() {
        let cli = Cli::try_parse_from([
            "keyfleet",
            "-u",
            "deploy",
            "--vmsfile",
            "hosts.txt",
            "--ssh-key",
            "~/.ssh/id_rsa.pub",
            "--dry-run",
            "-j",
            "8",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.copy.user.as_deref(), Some("deploy"));
        assert_eq!(cli.copy.hosts_file.as_deref(), Some("hosts.txt"));
        assert_eq!(cli.copy.ssh_key.as_deref(), Some("~/.ssh/id_rsa.pub"));
        assert!(cli.copy.dry_run);
        assert_eq!(cli.copy.parallelism, Some(8));
    }

    #[test]
    fn test_negative_parallelism_is_accepted() {
        let cli = Cli::try_parse_from(["keyfleet", "-u", "deploy", "-j", "-2"]).unwrap();
        assert_eq!(cli.copy.parallelism, Some(-2));
    }

    #[test]
    fn test_user_is_optional_at_parse_time() {
        // Missing --user is reported by the copy command with exit code 1
        let cli = Cli::try_parse_from(["keyfleet"]).unwrap();
        assert!(cli.copy.user.is_none());
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = Cli::try_parse_from(["keyfleet", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Completions { shell: Shell::Bash })
        ));
    }
}
