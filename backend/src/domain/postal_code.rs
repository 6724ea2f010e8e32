//! Postal code (CEP) primitive and its format check.

use std::fmt;

/// Number of digits in a CEP.
pub const POSTAL_CODE_DIGITS: usize = 8;

/// Validation errors returned by [`PostalCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    Empty,
    WrongLength { length: usize },
    NonDigit,
}

impl fmt::Display for PostalCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "postal code must not be empty"),
            Self::WrongLength { length } => write!(
                f,
                "postal code must have {POSTAL_CODE_DIGITS} digits, got {length} characters"
            ),
            Self::NonDigit => write!(f, "postal code may only contain decimal digits"),
        }
    }
}

impl std::error::Error for PostalCodeError {}

/// Check the format of a raw code without building a [`PostalCode`].
///
/// Surrounding whitespace is ignored; the remainder must be exactly eight
/// ASCII digits.
///
/// # Examples
/// ```
/// use cep_weather::domain::postal_code::validate;
///
/// assert!(validate("01001000"));
/// assert!(validate(" 01001000\n"));
/// assert!(!validate(" 01001-000 "));
/// assert!(!validate("123"));
/// ```
#[must_use]
pub fn validate(raw: &str) -> bool {
    PostalCode::parse(raw).is_ok()
}

/// Eight-digit postal area identifier, trimmed and validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Trim and validate a raw code.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError`] when the trimmed value is empty, has the
    /// wrong length, or contains anything other than ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PostalCodeError::Empty);
        }
        // Count chars, not bytes, so multi-byte input reports a sensible length.
        let length = trimmed.chars().count();
        if length != POSTAL_CODE_DIGITS {
            return Err(PostalCodeError::WrongLength { length });
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
