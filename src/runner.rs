use std::path::PathBuf;

use keycopy::command::HELPER_PROGRAM;

/// Locate an executable on `PATH`
pub fn find_program(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Locate `sshpass`, logging what was found
pub fn locate_helper() -> Option<PathBuf> {
    let found = find_program(HELPER_PROGRAM);
    match &found {
        Some(path) => log::debug!("{} found at {}", HELPER_PROGRAM, path.display()),
        None => log::debug!("{} not found in PATH", HELPER_PROGRAM),
    }
    found
}
