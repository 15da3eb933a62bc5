use super::kind::ErrorKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One classified failure, kept for operator visibility and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Where the failure happened, e.g. `turn:architect` or `reconcile:manual`.
    pub context: String,
}

impl ErrorRecord {
    /// Record stamped now, carrying the kind's fixed hint.
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: Some(kind.hint().to_string()),
            timestamp: Utc::now(),
            context: context.into(),
        }
    }

    pub fn without_hint(mut self) -> Self {
        self.hint = None;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.context, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_carries_hint() {
        let record = ErrorRecord::new(ErrorKind::RateLimit, "429", "turn:critic");
        assert_eq!(record.hint.as_deref(), Some(ErrorKind::RateLimit.hint()));
        assert!(record.to_string().starts_with("[RATE_LIMIT] turn:critic: 429"));
    }

    #[test]
    fn test_serde_roundtrip_without_hint() {
        let record = ErrorRecord::new(ErrorKind::Unknown, "empty", "reconcile:auto").without_hint();
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("hint"));
        let back: ErrorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
