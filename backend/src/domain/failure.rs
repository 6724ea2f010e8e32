//! Failure taxonomy shared by both services.
//!
//! These failures are transport agnostic. Inbound adapters map them to HTTP
//! status codes and bodies; the domain only records what went wrong and where.

use std::fmt;

/// Caller-visible failure category. The set is closed: every failure path
/// resolves to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The code is malformed or was rejected as malformed upstream.
    InvalidInput,
    /// The code is well formed but does not exist.
    NotFound,
    /// A dependency could not be reached or answered with a failure status.
    Unavailable,
    /// A payload could not be decoded or encoded.
    ParseFailure,
}

impl FailureKind {
    /// Stable snake-case name used in logs and span tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
            Self::ParseFailure => "parse_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step of the chain where a failure was detected.
///
/// The entry service moves through `Validate → Forward → Transform → Reply`;
/// the resolution service through `Validate → LocationLookup →
/// WeatherLookup → Reply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    Forward,
    Transform,
    LocationLookup,
    WeatherLookup,
    Reply,
}

impl Stage {
    /// Stable snake-case name used in logs and span tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Forward => "forward",
            Self::Transform => "transform",
            Self::LocationLookup => "location_lookup",
            Self::WeatherLookup => "weather_lookup",
            Self::Reply => "reply",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a failed request, produced where the failure is detected and
/// consumed once by the HTTP error mapping.
///
/// # Examples
/// ```
/// use cep_weather::domain::{FailureKind, FailureSignal, Stage};
///
/// let failure = FailureSignal::not_found(Stage::LocationLookup, "no such CEP");
/// assert_eq!(failure.kind(), FailureKind::NotFound);
/// assert_eq!(failure.to_string(), "not_found during location_lookup: no such CEP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} during {stage}: {message}")]
pub struct FailureSignal {
    kind: FailureKind,
    stage: Stage,
    message: String,
}

impl FailureSignal {
    /// Create a failure of any kind.
    pub fn new(kind: FailureKind, stage: Stage, message: impl Into<String>) -> Self {
        Self {
            kind,
            stage,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`FailureKind::InvalidInput`].
    pub fn invalid_input(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidInput, stage, message)
    }

    /// Convenience constructor for [`FailureKind::NotFound`].
    pub fn not_found(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, stage, message)
    }

    /// Convenience constructor for [`FailureKind::Unavailable`].
    pub fn unavailable(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unavailable, stage, message)
    }

    /// Convenience constructor for [`FailureKind::ParseFailure`].
    pub fn parse_failure(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(FailureKind::ParseFailure, stage, message)
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Stage that detected the failure.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Diagnostic message. Never sent to clients verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}
