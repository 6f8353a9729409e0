//! Error types for FactoryOS API operations.
//!
//! Errors are categorized so callers can tell a fatal transport failure
//! apart from an item-level rejection they may safely ignore.

use std::fmt;

/// Result type alias for FactoryOS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of body characters kept in an HTTP error message.
pub const ERROR_BODY_LIMIT: usize = 200;

/// Categories of FactoryOS errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The API could not be reached.
    Network,
    /// Credentials were rejected or no token was issued.
    Unauthorized,
    /// The record already exists on the server (may be ignorable).
    AlreadyExists,
    /// The server rejected the payload.
    Validation,
    /// The server answered with something we could not parse.
    InvalidResponse,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error can be safely ignored (record already there).
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::AlreadyExists)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "API unreachable",
            Self::Unauthorized => "Authentication failed",
            Self::AlreadyExists => "Already exists",
            Self::Validation => "Rejected by the API",
            Self::InvalidResponse => "Malformed API response",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the API gateway is running and the base URL is correct",
            Self::Unauthorized => "Check the admin credentials (--user / --password)",
            Self::AlreadyExists => "Nothing to do, the record is already seeded",
            Self::Validation => "Check the payload against the API schema",
            Self::InvalidResponse => "Check that the base URL points at the FactoryOS API",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the FactoryOS API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection refused, DNS, timeout).
    #[error("cannot reach {url}: {message}")]
    Unreachable {
        /// URL that was requested.
        url: String,
        /// Underlying transport error.
        message: String,
    },

    /// The API answered with a failure.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error text as reported by the API.
        message: String,
    },

    /// Health endpoint did not report success.
    #[error("API health check failed")]
    Unhealthy,

    /// Login succeeded at the HTTP level but no token was returned.
    #[error("login failed: {0}")]
    NoToken(String),

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Build the error for a non-2xx response from its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        Self::api(status, format!("HTTP {status}: {body}"))
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Unreachable { .. } => ErrorCategory::Network,
            Error::Api { status, message } => {
                let lower = message.to_lowercase();
                if lower.contains("already exists") || lower.contains("duplicate") {
                    ErrorCategory::AlreadyExists
                } else if matches!(status, 401 | 403) {
                    ErrorCategory::Unauthorized
                } else if *status >= 500 {
                    ErrorCategory::Other
                } else {
                    ErrorCategory::Validation
                }
            }
            Error::Unhealthy => ErrorCategory::Network,
            Error::NoToken(_) => ErrorCategory::Unauthorized,
            Error::InvalidResponse(_) => ErrorCategory::InvalidResponse,
        }
    }

    /// Whether the message carries the exact "already exists" phrase.
    ///
    /// User registration only treats this phrase as success, while machine
    /// creation also accepts "duplicate" in any case.
    #[must_use]
    pub fn says_already_exists(&self) -> bool {
        match self {
            Error::Api { message, .. } => message.contains("already exists"),
            _ => false,
        }
    }

    /// Whether this error can be safely ignored.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        self.category().is_ignorable()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
