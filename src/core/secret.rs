//! Secret values for the Hevy API key and the SMTP password.
//!
//! Secrets only ever come from the process environment. They are zeroed on
//! drop and never show up in `Debug`/`Display` output, so a `Config` can be
//! logged or printed without leaking credentials.

use std::fmt;

use zeroize::Zeroize;

/// A secret value that is zeroed on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue {
    value: String,
}

impl SecretValue {
    /// Create a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    /// Build a secret from an optional raw value, treating blank input as absent.
    pub fn non_empty(value: Option<String>) -> Option<Self> {
        value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).map(Self::new)
    }

    /// Get the secret value.
    ///
    /// Note: Use sparingly and ensure the value is not logged.
    pub fn expose(&self) -> &str {
        &self.value
    }
}

// Prevent accidental logging of secrets
impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED])")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}
