//! Raw provider failures and their deterministic classification.

use super::kind::ErrorKind;
use thiserror::Error;

/// What went wrong talking to the completion provider, before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("provider returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("provider call timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("no credential configured for the provider")]
    MissingCredential,
}

const AUTH_WORDS: &[&str] = &[
    "api key",
    "api_key",
    "apikey",
    "unauthorized",
    "unauthenticated",
    "forbidden",
    "credential",
    "permission denied",
    "invalid token",
    "authentication",
];

const RATE_LIMIT_WORDS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "ratelimit",
    "too many requests",
    "quota",
    "throttl",
    "resource exhausted",
    "resource_exhausted",
];

const SERVER_WORDS: &[&str] = &[
    "unavailable",
    "overloaded",
    "timeout",
    "timed out",
    "internal error",
    "internal server error",
    "bad gateway",
    "connection",
];

const INVALID_REQUEST_WORDS: &[&str] = &[
    "safety",
    "policy",
    "blocked",
    "content filter",
    "content_filter",
    "invalid request",
    "invalid_request",
    "invalid argument",
];

impl ProviderFailure {
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Classify into an [`ErrorKind`].
    ///
    /// Status codes win over message wording; wording is only consulted for
    /// codes without a fixed meaning.
    pub fn classify(&self) -> ErrorKind {
        match self {
            ProviderFailure::MissingCredential => ErrorKind::Auth,
            ProviderFailure::Timeout => ErrorKind::Server,
            ProviderFailure::EmptyResponse => ErrorKind::Unknown,
            ProviderFailure::Malformed(_) => ErrorKind::Unknown,
            ProviderFailure::Status { code, message } => {
                classify_status(*code).unwrap_or_else(|| classify_message(message))
            }
            ProviderFailure::Transport(message) => match classify_message(message) {
                ErrorKind::Unknown => ErrorKind::Server,
                kind => kind,
            },
        }
    }
}

fn classify_status(code: u16) -> Option<ErrorKind> {
    match code {
        401 | 403 => Some(ErrorKind::Auth),
        429 => Some(ErrorKind::RateLimit),
        400 | 422 => Some(ErrorKind::InvalidRequest),
        408 | 500..=599 => Some(ErrorKind::Server),
        _ => None,
    }
}

/// Wording-based classification, checked in precedence order.
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if mentions(AUTH_WORDS) {
        ErrorKind::Auth
    } else if mentions(RATE_LIMIT_WORDS) {
        ErrorKind::RateLimit
    } else if mentions(SERVER_WORDS) {
        ErrorKind::Server
    } else if mentions(INVALID_REQUEST_WORDS) {
        ErrorKind::InvalidRequest
    } else {
        ErrorKind::Unknown
    }
}
