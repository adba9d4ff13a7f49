//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret so that it can be printed in `Debug` output.
///
/// - Empty input prints `EMPTY`.
/// - Input shorter than 12 characters is redacted entirely.
/// - Longer input keeps the first three and the last three characters.
///
/// Keeping both ends lets operators tell two tokens apart without leaking either.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

/// Join an API base address and a relative path with exactly one `/` between them.
///
/// ```
/// use vaultsign_core::utils::join_url;
///
/// assert_eq!(
///     join_url("https://vault.example.com:8200/", "/v1/auth/aws/login"),
///     "https://vault.example.com:8200/v1/auth/aws/login"
/// );
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
