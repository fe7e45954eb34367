//! Password container that is wiped when dropped.

use std::fmt;
use zeroize::Zeroizing;

/// A password typed by the user.
///
/// The backing buffer is zeroed on drop. `Debug` never prints the value.
/// Nothing can guarantee the OS never paged out a copy, so the binary should
/// still drop its settings as soon as dispatch returns.
#[derive(Clone, Default)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(value: String) -> Self {
        Self(Zeroizing::new(value))
    }

    /// Borrow the raw value. Only the command builder should need this.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Secret(<empty>)")
        } else {
            f.write_str("Secret(********)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_value() {
        let secret = Secret::from("hunter2");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
        assert_eq!(rendered, "Secret(********)");
    }

    #[test]
    fn test_empty_secret() {
        let secret = Secret::default();
        assert!(secret.is_empty());
        assert_eq!(format!("{secret:?}"), "Secret(<empty>)");
    }

    #[test]
    fn test_expose() {
        let secret = Secret::new("s3cret".to_string());
        assert_eq!(secret.expose(), "s3cret");
        assert!(!secret.is_empty());
    }
}
