//! Error types for reconciliation.
//!
//! Every failure ends the reconciliation immediately. Errors that happen after
//! the first request carry the [`Phase`] they happened in, so callers can tell
//! a failed update apart from a failed re-read after an update.

use std::fmt;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The request a reconciliation was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Listing the collection to look the resource up by name.
    List,
    /// Creating a missing resource.
    Create,
    /// Updating an existing resource.
    Update,
    /// Re-reading the collection after a successful update.
    Refresh,
    /// Deleting an existing resource.
    Delete,
}

impl Phase {
    /// Short lowercase name, used in messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Refresh => "refresh",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of reconciliation errors.
///
/// The engine never retries; categories exist so that a caller can decide
/// whether a retry is worthwhile and what to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or missing caller parameters. Detected before any request.
    Configuration,
    /// The HTTP call could not complete.
    Transport,
    /// The server answered with an unexpected status.
    Remote,
    /// A response body could not be decoded.
    Decode,
}

impl ErrorCategory {
    /// Whether this category is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Invalid configuration",
            Self::Transport => "Could not reach the server",
            Self::Remote => "Unexpected server response",
            Self::Decode => "Malformed server response",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Configuration => "Check the url, token, state and resource parameters",
            Self::Transport => "Check that the API url is reachable and try again",
            Self::Remote => "Inspect the status code and response body returned by the server",
            Self::Decode => "Verify that the url points at the API root and not the web UI",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while reconciling a resource.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid caller parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be performed.
    #[error("{phase} request failed: {message}")]
    Transport {
        /// Phase of the failed request.
        phase: Phase,
        /// Underlying cause, as reported by the transport.
        message: String,
    },

    /// The server answered with a status other than the expected one.
    #[error("{phase} request returned unexpected status {status}: {body}")]
    Remote {
        /// Phase of the failed request.
        phase: Phase,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A response body could not be decoded.
    #[error("cannot read {phase} response: {message}")]
    Decode {
        /// Phase of the failed request.
        phase: Phase,
        /// Decoder message.
        message: String,
    },

    /// The record disappeared between the update and the re-read.
    #[error("{name:?} was updated but is no longer listed by the server")]
    Vanished {
        /// Name that was looked up.
        name: String,
    },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Get the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::Remote { .. } | Self::Vanished { .. } => ErrorCategory::Remote,
            Self::Decode { .. } => ErrorCategory::Decode,
        }
    }

    /// Phase the error happened in, if it happened after the first request.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Configuration(_) => None,
            Self::Transport { phase, .. }
            | Self::Remote { phase, .. }
            | Self::Decode { phase, .. } => Some(*phase),
            Self::Vanished { .. } => Some(Phase::Refresh),
        }
    }

    /// HTTP status code, for remote errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, for remote errors.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Remote { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether this error is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote { status, .. } => *status >= 500,
            _ => self.category().is_retryable(),
        }
    }
}
