//! Host list file: one hostname or IP per line, `#` comments

use anyhow::{Context, Result};
use keycopy::Host;
use std::fs;
use std::path::Path;

/// Read and parse a host list file
pub fn load(path: &Path) -> Result<Vec<Host>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not open host list {}", path.display()))?;
    Ok(parse(&content))
}

/// Parse host list content.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. An entry with
/// inner whitespace is kept but warned about.
pub fn parse(content: &str) -> Vec<Host> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = idx + 1;
            let entry = raw.trim();
            if entry.is_empty() || entry.starts_with('#') {
                return None;
            }
            if entry.contains(char::is_whitespace) {
                log::warn!(
                    "Host list line {line}: entry '{entry}' contains whitespace. \
                     Ensure each line has only one hostname/IP."
                );
            }
            Some(Host::new(entry, line))
        })
        .collect()
}
