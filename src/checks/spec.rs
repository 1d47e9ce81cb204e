//! Check specifications
//!
//! A [`CheckSpec`] is the immutable description of one endpoint probe:
//! where to send the request and what the response has to look like for
//! the check to pass. Specs are built from the watchlist file, a JSON
//! object keyed by target URL:
//!
//! ```json
//! {
//!     "https://example.com": { "status": 200, "text_in_raw": "Welcome" },
//!     "https://api.example.com/health": { "method": "HEAD" }
//! }
//! ```
//!
//! Because the watchlist is a JSON object, a target can only appear once;
//! a repeated key keeps the last entry.

use serde::Deserialize;

/// Validation rules for one watchlist entry (the JSON object value).
///
/// All fields are optional in the file; missing values fall back to a
/// plain `GET` expecting `200`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRules {
    /// HTTP verb to probe with
    #[serde(default = "default_method")]
    pub method: String,

    /// Status code the response must carry
    #[serde(default = "default_status")]
    pub status: u16,

    /// Substring that must appear in the raw response body
    pub text_in_raw: Option<String>,

    /// Substring that must appear in the page text after markup is stripped
    pub text_in_html: Option<String>,
}

impl Default for CheckRules {
    fn default() -> Self {
        Self {
            method: default_method(),
            status: default_status(),
            text_in_raw: None,
            text_in_html: None,
        }
    }
}

fn default_method() -> String {
    String::from("GET")
}

fn default_status() -> u16 {
    200
}

/// One endpoint and its pass criteria, resolved from the watchlist.
///
/// The `target` is unique within a run and doubles as the key under which
/// the outcome is reported.
#[derive(Debug, Clone)]
pub struct CheckSpec {
    /// Target URL, non-empty, unique within a run
    pub target: String,

    /// HTTP verb, e.g. `GET` or `HEAD`
    pub method: String,

    /// Expected response status code
    pub expected_status: u16,

    /// Raw-body containment rule
    pub text_in_raw: Option<String>,

    /// Rendered-text containment rule (markup stripped before matching)
    pub text_in_html: Option<String>,
}

impl CheckSpec {
    /// Pair a watchlist key with its rules.
    pub fn resolve(target: impl Into<String>, rules: CheckRules) -> Self {
        Self {
            target: target.into(),
            method: rules.method,
            expected_status: rules.status,
            text_in_raw: rules.text_in_raw,
            text_in_html: rules.text_in_html,
        }
    }

    /// Shorthand for a spec that only cares about the status code.
    pub fn status_only(target: impl Into<String>, expected_status: u16) -> Self {
        Self {
            target: target.into(),
            method: default_method(),
            expected_status,
            text_in_raw: None,
            text_in_html: None,
        }
    }
}
