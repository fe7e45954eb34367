use anyhow::{Context as AnyhowContext, Result};
use clap::CommandFactory;
use keycopy::{ExecutionSettings, Secret, SystemRunner, Tally, dispatch};
use std::path::PathBuf;

use crate::Context;
use crate::cli::{Cli, CopyArgs};
use crate::config::{CopyOptions, FleetConfig};
use crate::{hostlist, paths, prompt, report, runner, ui};

/// Copy the key to every host; returns the process exit code
pub fn run(ctx: &Context, args: CopyArgs) -> Result<u8> {
    let Some(user) = args.user.clone().filter(|u| !u.is_empty()) else {
        ui::error("--user is required");
        eprintln!("{}", Cli::command().render_usage());
        return Ok(1);
    };

    let opts = CopyOptions::resolve(&args, FleetConfig::load()?);

    let hosts_file = match &opts.hosts_file {
        Some(path) => paths::expand(path),
        None => paths::default_hosts_file()?,
    };
    let hosts = hostlist::load(&hosts_file)
        .with_context(|| format!("Error loading host list from {}", hosts_file.display()))?;

    let key_path = resolve_key_path(opts.ssh_key.as_deref())?;

    if hosts.is_empty() {
        ui::info(&format!(
            "No hosts found in the host list file: {}",
            hosts_file.display()
        ));
        return Ok(0);
    }

    let secret = prompt::password()?;
    let helper_program = if opts.use_sshpass {
        runner::locate_helper()
    } else {
        log::info!("sshpass usage has been explicitly disabled");
        None
    };
    report_helper_choice(&secret, helper_program.as_ref(), opts.use_sshpass);

    let settings = ExecutionSettings {
        username: user,
        secret,
        key_path,
        dry_run: opts.dry_run,
        copy_id_program: opts.copy_id_path.as_deref().map(paths::expand),
        helper_program,
        use_helper: opts.use_sshpass,
        accept_new_host_keys: opts.accept_new_host_keys,
    };

    if !ctx.quiet {
        print_plan(&hosts_file, hosts.len(), &settings, opts.parallelism);
        if ctx.verbose > 0 {
            ui::kv("Config file", &paths::config_file()?.display().to_string());
        }
        println!();
    }

    let mut results = dispatch::run(&hosts, &settings, opts.parallelism, &SystemRunner)
        .context("Failed to dispatch hosts")?;
    // Wipes the password as soon as no worker can need it
    drop(settings);

    report::order_by_host_list(&mut results, &hosts);
    let tally = Tally::from_results(&results);
    report::render(&results, &tally);

    Ok(tally.exit_code())
}

/// `--ssh-key` (or config `ssh_key`) wins over default discovery
fn resolve_key_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path = paths::expand(path);
        log::info!("Using SSH key path: {}", path.display());
        return Ok(path);
    }
    paths::default_key_path().context(
        "SSH key path could not be determined. Please use --ssh-key or ensure a default key \
         (e.g. ~/.ssh/id_ed25519.pub) exists.",
    )
}

fn report_helper_choice(secret: &Secret, helper: Option<&PathBuf>, enabled: bool) {
    match (secret.is_empty(), helper) {
        (true, _) => log::warn!(
            "No password entered. ssh-copy-id might prompt if needed or fail if password \
             is required by servers."
        ),
        (false, Some(path)) => log::info!(
            "sshpass found at {}. Will be used for password authentication.",
            path.display()
        ),
        (false, None) if enabled => log::warn!(
            "sshpass command not found in PATH. Will rely on ssh-copy-id's interactive \
             password prompt."
        ),
        (false, None) => {}
    }
}

fn print_plan(
    hosts_file: &std::path::Path,
    count: usize,
    settings: &ExecutionSettings,
    parallelism: i64,
) {
    ui::header("Execution Plan");
    ui::kv("Host list file", &hosts_file.display().to_string());
    ui::kv("Target username", &settings.username);
    ui::kv("Hosts to process", &count.to_string());
    ui::kv("SSH key", &settings.key_path.display().to_string());
    ui::kv("Dry run", &settings.dry_run.to_string());
    ui::kv(
        "Parallelism",
        &format!("{} ({} workers)", parallelism, dispatch::worker_count(parallelism, count)),
    );
    ui::kv("Using sshpass", &settings.helper_active().to_string());
    ui::kv("Accept new host keys", &settings.accept_new_host_keys.to_string());
}
