//! Per-check results
//!
//! A [`CheckOutcome`] is created the moment a single check finishes,
//! whether it passed, failed validation, or never got a response. It is
//! never mutated afterwards; the report owns them from then on.

use std::fmt;

use chrono::{DateTime, Utc};

/// Severity of a single check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Error => "ERROR",
        }
    }
}

/// The result of one endpoint check.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Target the check ran against
    pub target: String,

    /// Pass/fail verdict
    pub level: Level,

    /// Human-readable description of what was observed
    pub message: String,

    /// When the check finished
    pub timestamp: DateTime<Utc>,
}

impl CheckOutcome {
    /// A passing outcome, stamped now.
    pub fn ok(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            level: Level::Ok,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// A failing outcome, stamped now.
    pub fn error(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            level: Level::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

/// Report line format, e.g. `[OK] https://example.com => Status code: '200'`.
impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} => {}", self.level.as_str(), self.target, self.message)
    }
}
