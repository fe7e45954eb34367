//! Dispatch engine - fans hosts out to a fixed pool of worker threads
//!
//! 1. Every host is pushed onto a job queue sized to the host list, then the
//!    queue is closed
//! 2. Exactly `worker_count` workers drain the queue, one host at a time
//! 3. Each result goes to a result channel that also fits every host, so a
//!    worker never blocks on publish
//! 4. The pool is joined before the result channel is drained
//!
//! Every host gets exactly one result. Completion order is not preserved.
//! There is no per-host timeout: a hung `ssh-copy-id` holds its worker until
//! it exits.

use crate::context::Runner;
use crate::error::Result;
use crate::executor::provision;
use crate::types::{ExecutionResult, ExecutionSettings, Host};
use crossbeam_channel::bounded;

/// Clamp a requested concurrency to `[1, hosts]`.
///
/// Zero or negative requests run sequentially; requests beyond the host
/// count would only leave idle workers.
pub fn worker_count(requested: i64, hosts: usize) -> usize {
    let requested = usize::try_from(requested).unwrap_or(0).max(1);
    requested.min(hosts.max(1))
}

/// Provision every host using at most `concurrency` parallel workers.
///
/// Blocks until all workers have exited. The only error is failing to build
/// the worker pool; per-host failures are reported in the returned results.
pub fn run<R: Runner>(
    hosts: &[Host],
    settings: &ExecutionSettings,
    concurrency: i64,
    runner: &R,
) -> Result<Vec<ExecutionResult>> {
    if hosts.is_empty() {
        return Ok(Vec::new());
    }

    let workers = worker_count(concurrency, hosts.len());
    log::debug!(
        "Dispatching {} hosts to {} workers (requested {})",
        hosts.len(),
        workers,
        concurrency
    );

    let (job_tx, job_rx) = bounded::<&Host>(hosts.len());
    let (result_tx, result_rx) = bounded::<ExecutionResult>(hosts.len());

    // The queue has room for every host and its receiver is alive, so these
    // sends cannot block or fail.
    for host in hosts {
        let _ = job_tx.send(host);
    }
    drop(job_tx);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("keycopy-worker-{}", i + 1))
        .build()?;

    pool.scope(|scope| {
        for worker_id in 1..=workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move |_| {
                for host in jobs.iter() {
                    log::info!(
                        "[Worker {}] Processing host: {} (from file line {})",
                        worker_id,
                        host.name,
                        host.line
                    );
                    let result = provision(host, settings, runner);
                    if results.send(result).is_err() {
                        log::error!("[Worker {worker_id}] result channel closed");
                        break;
                    }
                }
                log::trace!("[Worker {worker_id}] queue drained, exiting");
            });
        }
    });
    drop(result_tx);

    Ok(result_rx.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ProvisionCommand;
    use crate::error::Error;
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    /// Counts invocations per target and tracks peak parallelism
    #[derive(Default)]
    struct CountingRunner {
        per_target: Mutex<HashMap<String, usize>>,
        active: AtomicUsize,
        peak: AtomicUsize,
        fail_target: Option<String>,
    }

    impl Runner for CountingRunner {
        fn run(&self, command: &ProvisionCommand) -> crate::Result<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));

            let target = command.argv().last().cloned().unwrap_or_default();
            *self
                .per_target
                .lock()
                .unwrap()
                .entry(target.clone())
                .or_default() += 1;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.fail_target.as_deref() == Some(target.as_str()) {
                return Err(Error::ExitStatus {
                    program: command.program().to_string(),
                    code: Some(1),
                });
            }
            Ok(())
        }
    }

    fn hosts(n: usize) -> Vec<Host> {
        (1..=n).map(|i| Host::new(format!("host-{i}"), i)).collect()
    }

    fn settings(key: &NamedTempFile) -> ExecutionSettings {
        ExecutionSettings {
            username: "deploy".into(),
            key_path: key.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_worker_count_clamping() {
        assert_eq!(worker_count(0, 10), 1);
        assert_eq!(worker_count(-5, 10), 1);
        assert_eq!(worker_count(1, 10), 1);
        assert_eq!(worker_count(4, 10), 4);
        assert_eq!(worker_count(50, 10), 10);
        assert_eq!(worker_count(3, 0), 1);
    }

    #[test]
    fn test_every_host_processed_exactly_once() {
        let key = NamedTempFile::new().unwrap();
        let hosts = hosts(25);
        let runner = CountingRunner::default();

        let results = run(&hosts, &settings(&key), 4, &runner).unwrap();

        assert_eq!(results.len(), hosts.len());
        let names: HashSet<_> = results.iter().map(|r| r.host.clone()).collect();
        let expected: HashSet<_> = hosts.iter().map(|h| h.name.clone()).collect();
        assert_eq!(names, expected);

        let counts = runner.per_target.lock().unwrap();
        assert_eq!(counts.len(), hosts.len());
        assert!(counts.values().all(|&n| n == 1));
    }

    #[test]
    fn test_concurrency_never_exceeds_cap() {
        let key = NamedTempFile::new().unwrap();
        let runner = CountingRunner::default();

        run(&hosts(12), &settings(&key), 3, &runner).unwrap();

        assert!(runner.peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_runs_requested_number_of_workers() {
        let key = NamedTempFile::new().unwrap();

        let capped = CountingRunner::default();
        let results = run(&hosts(12), &settings(&key), 3, &capped).unwrap();
        assert_eq!(results.len(), 12);
        assert_eq!(capped.peak.load(Ordering::SeqCst), 3);

        let clamped = CountingRunner::default();
        let results = run(&hosts(3), &settings(&key), 64, &clamped).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(clamped.peak.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_non_positive_concurrency_runs_sequentially() {
        let key = NamedTempFile::new().unwrap();
        for requested in [0, -3] {
            let runner = CountingRunner::default();
            let results = run(&hosts(5), &settings(&key), requested, &runner).unwrap();
            assert_eq!(results.len(), 5);
            assert_eq!(runner.peak.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_oversized_concurrency_covers_all_hosts() {
        let key = NamedTempFile::new().unwrap();
        let runner = CountingRunner::default();

        let results = run(&hosts(3), &settings(&key), 64, &runner).unwrap();

        assert_eq!(results.len(), 3);
        assert!(runner.peak.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_empty_host_list() {
        let key = NamedTempFile::new().unwrap();
        let runner = CountingRunner::default();
        let results = run(&[], &settings(&key), 5, &runner).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_failure_is_isolated() {
        let key = NamedTempFile::new().unwrap();
        let runner = CountingRunner {
            fail_target: Some("deploy@host-2".into()),
            ..Default::default()
        };

        let results = run(&hosts(4), &settings(&key), 2, &runner).unwrap();

        assert_eq!(results.len(), 4);
        let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].host, "host-2");
    }

    #[test]
    fn test_dry_run_is_idempotent() {
        let key = NamedTempFile::new().unwrap();
        let hosts = vec![Host::new("alpha", 1), Host::new("beta", 4)];
        let settings = ExecutionSettings {
            dry_run: true,
            ..settings(&key)
        };
        let runner = CountingRunner::default();

        let sorted = |mut results: Vec<ExecutionResult>| {
            results.sort_by(|a, b| a.host.cmp(&b.host));
            results
                .into_iter()
                .map(|r| (r.host, r.message, r.success))
                .collect::<Vec<_>>()
        };
        let first = sorted(run(&hosts, &settings, 2, &runner).unwrap());
        let second = sorted(run(&hosts, &settings, 2, &runner).unwrap());

        assert_eq!(first, second);
        assert!(first.iter().all(|(_, _, success)| *success));
        assert!(first[0].1.contains("deploy@alpha"));
        assert!(first[1].1.contains("deploy@beta"));
        assert!(runner.per_target.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_key_fails_every_host_without_running() {
        let settings = ExecutionSettings {
            username: "deploy".into(),
            key_path: PathBuf::from("/nonexistent/keyfleet/id_ed25519.pub"),
            ..Default::default()
        };
        let runner = CountingRunner::default();

        let results = run(&[Host::new("alpha", 1)], &settings, 5, &runner).unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].message.contains("/nonexistent/keyfleet/id_ed25519.pub"));
        assert!(results[0].message.contains("alpha"));
        assert!(runner.per_target.lock().unwrap().is_empty());
    }
}
