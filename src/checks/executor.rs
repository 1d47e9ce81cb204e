//! Single-probe execution
//!
//! [`execute`] performs one HTTP probe and validates the response.
//! Whatever happens on the wire (timeout, refused connection, DNS or TLS
//! trouble, a body that cuts off) is folded into an ERROR-level
//! [`CheckOutcome`]; nothing escapes this boundary. One call, one
//! outcome, no retries.

use std::fmt;

use reqwest::{Client, Method};
use tracing::{debug, instrument, trace, warn};

use super::html::visible_text;
use super::outcome::CheckOutcome;
use super::spec::CheckSpec;

/// User-Agent header sent with every probe, identifying the monitor.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Failure classes for a probe that never produced a usable response.
///
/// Not faults of the run: each becomes the message of an ERROR outcome
/// and the run carries on.
#[derive(Debug)]
enum TransportFault {
    /// The client-level request timeout elapsed
    Timeout,

    /// The host could not be reached (TCP, DNS or TLS)
    Connect(String),

    /// The exchange failed for another reason (protocol error, redirect
    /// policy, invalid URL)
    Request(String),

    /// A response arrived but its body could not be read
    BodyRead(String),
}

impl TransportFault {
    fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFault::Timeout
        } else if err.is_connect() {
            TransportFault::Connect(root_cause(err))
        } else if err.is_body() || err.is_decode() {
            TransportFault::BodyRead(root_cause(err))
        } else {
            TransportFault::Request(root_cause(err))
        }
    }
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFault::Timeout => write!(f, "Request timed out"),
            TransportFault::Connect(detail) => write!(f, "Connection failed: {detail}"),
            TransportFault::Request(detail) => write!(f, "Request failed: {detail}"),
            TransportFault::BodyRead(detail) => {
                write!(f, "Could not read response body: {detail}")
            }
        }
    }
}

/// Innermost source message; reqwest's top-level text repeats the URL,
/// which the outcome already carries.
fn root_cause(err: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = err;
    while let Some(inner) = source.source() {
        source = inner;
    }
    source.to_string()
}

/// Probe one endpoint and fold whatever happens into a single outcome.
///
/// Validation order: the status rule first (a mismatch stops evaluation
/// right there), then the rendered-text rule and the raw-body rule,
/// independently of each other. Required text must be present for a rule
/// to pass. Each evaluated rule contributes one observation to the
/// outcome message; the verdict is ERROR iff any rule failed.
#[instrument(skip_all, fields(target = %spec.target))]
pub async fn execute(client: &Client, spec: &CheckSpec) -> CheckOutcome {
    trace!("probing {} {}", spec.method, spec.target);

    let method = match Method::from_bytes(spec.method.as_bytes()) {
        Ok(method) => method,
        Err(_) => {
            return CheckOutcome::error(
                &spec.target,
                format!("Invalid request method: '{}'", spec.method),
            );
        }
    };

    let response = match client.request(method, &spec.target).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("probe failed: {e}");
            return CheckOutcome::error(&spec.target, TransportFault::classify(&e).to_string());
        }
    };

    let status = response.status().as_u16();
    if status != spec.expected_status {
        debug!("status mismatch: got {status}, expected {}", spec.expected_status);
        return CheckOutcome::error(
            &spec.target,
            format!(
                "Status code mismatch. Got {status} instead of {}",
                spec.expected_status
            ),
        );
    }

    let mut observations = vec![format!("Status code: '{status}'")];
    let mut failed = false;

    // Only download the body when a text rule needs it; a matching status
    // code alone already decides rule-less checks.
    if spec.text_in_raw.is_some() || spec.text_in_html.is_some() {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("could not read body: {e}");
                return CheckOutcome::error(
                    &spec.target,
                    TransportFault::classify(&e).to_string(),
                );
            }
        };

        if let Some(needle) = &spec.text_in_html {
            if visible_text(&body).contains(needle.as_str()) {
                observations.push(format!("Text in HTML found: '{needle}'"));
            } else {
                failed = true;
                observations.push(format!("Text in HTML not found: '{needle}'"));
            }
        }

        if let Some(needle) = &spec.text_in_raw {
            if body.contains(needle.as_str()) {
                observations.push(format!("String found: '{needle}'"));
            } else {
                failed = true;
                observations.push(format!("String not found: '{needle}'"));
            }
        }
    }

    let message = observations.join("; ");
    if failed {
        debug!("validation failed");
        CheckOutcome::error(&spec.target, message)
    } else {
        trace!("check passed");
        CheckOutcome::ok(&spec.target, message)
    }
}
