use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Failure classification for completion-provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or rejected credential
    Auth,
    /// Provider throttling or exhausted quota
    RateLimit,
    /// Upstream transient failure, including timeouts
    Server,
    /// Request rejected as malformed or by content policy
    InvalidRequest,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Auth,
        ErrorKind::RateLimit,
        ErrorKind::Server,
        ErrorKind::InvalidRequest,
        ErrorKind::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "AUTH",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::Server => "SERVER",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Fixed remediation hint shown to the operator.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorKind::Auth => {
                "Check that the provider API key is set and valid, then restart the session."
            }
            ErrorKind::RateLimit => {
                "The provider is throttling requests. Try again after a short cooldown."
            }
            ErrorKind::Server => {
                "The provider is unavailable or timed out. Try again after a short cooldown."
            }
            ErrorKind::InvalidRequest => {
                "The request was rejected. Rephrase the message or shorten the shared state."
            }
            ErrorKind::Unknown => {
                "Unexpected provider response. Retry, and check the logs if it persists."
            }
        }
    }

    /// Whether waiting and retrying could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::RateLimit | ErrorKind::Server)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "AUTH" => Ok(ErrorKind::Auth),
            "RATE_LIMIT" => Ok(ErrorKind::RateLimit),
            "SERVER" => Ok(ErrorKind::Server),
            "INVALID_REQUEST" => Ok(ErrorKind::InvalidRequest),
            "UNKNOWN" => Ok(ErrorKind::Unknown),
            other => Err(format!("unknown error kind: {}", other)),
        }
    }
}
