//! Email address validation.
//!
//! Addresses arrive as free-form strings from web clients; [`Email::parse`]
//! is the single gate they pass before being trusted for relay or attached
//! to an order. Validation is structural (shape, not deliverability): one
//! `@` with text on both sides, no whitespace, bounded length.

use core::fmt;

/// Why an address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing was supplied at all.
    #[error("email cannot be empty")]
    Empty,
    /// The input exceeds the RFC 5321 length limit.
    #[error("email exceeds {} characters", Email::MAX_LENGTH)]
    TooLong,
    /// The input is not `name@domain` with non-empty parts.
    #[error("email must look like name@domain")]
    Malformed,
}

/// A structurally valid email address.
///
/// Construction guarantees: non-empty, at most [`Email::MAX_LENGTH`] bytes,
/// exactly one `@` with text on both sides, no whitespace. Deliverability
/// is not checked; the SMTP relay is the judge of that.
///
/// ```
/// use fresca_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("not-an-address").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// RFC 5321 upper bound on address length.
    pub const MAX_LENGTH: usize = 254;

    /// Validate and wrap an address. Callers trim before parsing; interior
    /// whitespace is rejected, not repaired.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] for empty or over-long input, or anything
    /// that is not `name@domain` with non-empty parts.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        if raw.is_empty() {
            return Err(EmailError::Empty);
        }
        if raw.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }
        match raw.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(raw.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The validated address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
