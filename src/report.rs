//! Result rendering

use colored::Colorize;
use keycopy::{ExecutionResult, Host, Tally};
use std::collections::HashMap;

use crate::ui;

/// Sort results into host-list order.
///
/// Workers finish in any order; sorting by the host's first position in the
/// list keeps the printed report stable between runs.
pub fn order_by_host_list(results: &mut [ExecutionResult], hosts: &[Host]) {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(hosts.len());
    for (idx, host) in hosts.iter().enumerate() {
        position.entry(host.name.as_str()).or_insert(idx);
    }
    results.sort_by_key(|r| position.get(r.host.as_str()).copied().unwrap_or(usize::MAX));
}

/// One display line per result
pub fn result_line(result: &ExecutionResult) -> String {
    let mut line = format!("{} - {}", result.host.bold(), result.message);
    if let Some(err) = &result.error {
        line.push_str(&format!(" {}", format!("(Details: {err})").dimmed()));
    }
    line
}

/// Final summary line
pub fn summary_line(tally: &Tally) -> String {
    format!(
        "SSH key copying finished. Succeeded: {}, Failed: {}",
        tally.succeeded, tally.failed
    )
}

/// Print every result, then the tally
pub fn render(results: &[ExecutionResult], tally: &Tally) {
    ui::header("Execution Results");
    for result in results {
        if result.success {
            ui::success(&result_line(result));
        } else {
            ui::error(&result_line(result));
        }
    }
    ui::rule(40);

    let summary = summary_line(tally);
    if tally.is_success() {
        ui::success(&summary);
    } else {
        ui::warn(&summary);
    }
    log::info!("{summary}");
}
