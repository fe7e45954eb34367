use anyhow::{Context, Result};
use dialoguer::Password;
use keycopy::Secret;
use zeroize::Zeroizing;

/// Ask for the SSH password with echo disabled.
///
/// An empty answer is allowed; `ssh-copy-id` then falls back to its own
/// prompt or to keys already loaded in the agent.
pub fn password() -> Result<Secret> {
    let raw = Zeroizing::new(
        Password::new()
            .with_prompt("Enter SSH password")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read password")?,
    );
    Ok(Secret::new(raw.trim().to_string()))
}
