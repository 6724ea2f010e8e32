//! Location text returned by the postal-code lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the city and the rest of a location string.
const CITY_SEPARATOR: char = ',';

/// Validation errors returned by [`Location::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationValidationError {
    Empty,
}

impl fmt::Display for LocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "location must not be empty"),
        }
    }
}

impl std::error::Error for LocationValidationError {}

/// Free-text place description, e.g. `"São Paulo, SP"`.
///
/// ## Invariants
/// - The text is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use cep_weather::domain::Location;
///
/// let location = Location::new("São Paulo, SP").expect("non-empty");
/// assert_eq!(location.city(), "São Paulo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// Validate and construct a [`Location`].
    ///
    /// # Errors
    ///
    /// Returns [`LocationValidationError::Empty`] for blank input.
    pub fn new(text: impl Into<String>) -> Result<Self, LocationValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(LocationValidationError::Empty);
        }
        Ok(Self(text))
    }

    /// Borrow the full location text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// City name: the text before the first separator, trimmed.
    #[must_use]
    pub fn city(&self) -> &str {
        self.0
            .split(CITY_SEPARATOR)
            .next()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or_else(|| self.0.trim())
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.0
    }
}

impl TryFrom<String> for Location {
    type Error = LocationValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("São Paulo, SP", "São Paulo")]
    #[case("  Recife ,PE", "Recife")]
    #[case("Brasília", "Brasília")]
    #[case(", DF", ", DF")]
    fn city_is_text_before_first_separator(#[case] raw: &str, #[case] expected: &str) {
        let location = Location::new(raw).expect("non-empty location");
        assert_eq!(location.city(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_text(#[case] raw: &str) {
        assert_eq!(Location::new(raw), Err(LocationValidationError::Empty));
    }

    #[test]
    fn deserialising_blank_text_fails() {
        let result: Result<Location, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
