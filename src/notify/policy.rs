//! Notification policy
//!
//! A pure decision over the run verdict and the heartbeat clock. The
//! caller owns the side effects: it loads the last-heartbeat timestamp,
//! feeds it in together with `now`, and persists the returned timestamp
//! when one comes back.

use chrono::{DateTime, Utc};

use crate::report::RunReport;

/// What a finished run calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Stay silent
    None,

    /// At least one check failed; notify immediately
    Alert,

    /// Everything is fine and the quiet period has elapsed
    Heartbeat,
}

/// Notification posture for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyPolicy {
    /// Whether a delivery channel is configured at all
    pub enabled: bool,

    /// Quiet period between all-clear messages, in seconds. `None`
    /// disables heartbeats without affecting alerts.
    pub heartbeat_every: Option<u64>,
}

/// Decide what (if anything) to send for a finished run.
///
/// Returns the decision together with the heartbeat timestamp to persist:
/// unchanged for [`Decision::None`] and [`Decision::Alert`], advanced to
/// `now` for [`Decision::Heartbeat`]. Only a heartbeat advances the
/// clock; an error burst never postpones the next all-clear.
pub fn decide(
    report: &RunReport,
    policy: &NotifyPolicy,
    last_notified: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (Decision, Option<DateTime<Utc>>) {
    if !policy.enabled {
        return (Decision::None, last_notified);
    }

    if report.has_errors {
        return (Decision::Alert, last_notified);
    }

    let Some(every) = policy.heartbeat_every else {
        return (Decision::None, last_notified);
    };
    let every = i64::try_from(every).unwrap_or(i64::MAX);

    let due = match last_notified {
        // No heartbeat on record yet; send one to establish the baseline.
        None => true,
        // Strictly greater: a run landing exactly on the boundary waits
        // for the next one.
        Some(last) => now.signed_duration_since(last).num_seconds() > every,
    };

    if due {
        (Decision::Heartbeat, Some(now))
    } else {
        (Decision::None, last_notified)
    }
}
