//! Concurrent check fan-out
//!
//! One tokio task per check, all sharing one pooled HTTP client, joined
//! before anything is reported. Checks are isolated from each other: a
//! slow, failing or even panicking check never blocks or drops the
//! others, and every spec is represented exactly once in the collected
//! outcomes. Order of the result is completion order and carries no
//! meaning.

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::executor;
use super::outcome::CheckOutcome;
use super::spec::CheckSpec;

/// Run every check concurrently and collect one outcome per spec.
///
/// Returns only after all checks have resolved. Concurrency is bounded
/// by the number of specs; there is no cap and no run deadline.
pub async fn run_all(client: &Client, specs: Vec<CheckSpec>) -> Vec<CheckOutcome> {
    run_all_with_deadline(client, specs, None).await
}

/// [`run_all`] with an optional whole-run deadline.
///
/// Checks still in flight when the deadline passes are cancelled at their
/// next await point and represented by an ERROR outcome, so the result
/// still holds exactly one outcome per spec.
#[instrument(skip_all, fields(checks = specs.len()))]
pub async fn run_all_with_deadline(
    client: &Client,
    specs: Vec<CheckSpec>,
    deadline: Option<Duration>,
) -> Vec<CheckOutcome> {
    let total = specs.len();
    let cutoff = deadline.map(|limit| tokio::time::Instant::now() + limit);

    let mut pending: FuturesUnordered<_> = specs
        .into_iter()
        .map(|spec| {
            let client = client.clone();
            let target = spec.target.clone();
            let handle = tokio::spawn(async move {
                match cutoff {
                    None => executor::execute(&client, &spec).await,
                    Some(at) => {
                        match tokio::time::timeout_at(at, executor::execute(&client, &spec)).await
                        {
                            Ok(outcome) => outcome,
                            Err(_) => CheckOutcome::error(
                                &spec.target,
                                "Run deadline exceeded before the check finished",
                            ),
                        }
                    }
                }
            });
            async move { (target, handle.await) }
        })
        .collect();

    let mut outcomes = Vec::with_capacity(total);
    while let Some((target, joined)) = pending.next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            // a panicking check must not take the rest of the run with it
            Err(e) => {
                warn!("check task for {target} did not finish: {e}");
                outcomes.push(CheckOutcome::error(
                    target,
                    "Check aborted by an internal failure",
                ));
            }
        }
    }

    debug!("collected {}/{total} outcomes", outcomes.len());
    outcomes
}
