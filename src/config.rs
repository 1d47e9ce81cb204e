//! Configuration and input files
//!
//! Settings come from a JSON file whose keys mirror the environment
//! variables that can override them, so `MAILGUN_TO` means the same thing
//! in `config.json` and in the environment. [`Config`] is the file as
//! parsed; [`Config::resolve`] applies the overrides and reduces it to the
//! [`ResolvedConfig`] the run works with.
//!
//! The watchlist is a separate JSON object mapping target URLs to their
//! validation rules.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::bail;
use tracing::{trace, warn};

use crate::checks::spec::{CheckRules, CheckSpec};

/// Settings file as written on disk. All keys are optional.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    pub mailgun_to: Option<String>,
    pub mailgun_from: Option<String>,
    pub mailgun_api_key: Option<String>,
    pub mailgun_domain: Option<String>,

    /// Master switch for e-mail delivery
    #[serde(default)]
    pub use_mailgun: bool,

    /// Quiet period between all-clear mails, in seconds. Absent or 0
    /// disables heartbeats; alerts are unaffected.
    pub heartbeat_every: Option<u64>,

    /// Whether probes follow HTTP redirects
    #[serde(default)]
    pub allow_redirects: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Skip TLS certificate verification. Only for watching hosts with
    /// known-broken certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Most recent report, rewritten every run
    #[serde(default = "default_report_log")]
    pub report_log: PathBuf,

    /// Accumulated reports across runs
    #[serde(default = "default_history_log")]
    pub history_log: PathBuf,

    /// Where the last-notified timestamp is kept
    #[serde(default = "default_heartbeat_file")]
    pub heartbeat_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailgun_to: None,
            mailgun_from: None,
            mailgun_api_key: None,
            mailgun_domain: None,
            use_mailgun: false,
            heartbeat_every: None,
            allow_redirects: false,
            request_timeout: default_request_timeout(),
            accept_invalid_certs: false,
            report_log: default_report_log(),
            history_log: default_history_log(),
            heartbeat_file: default_heartbeat_file(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_report_log() -> PathBuf {
    PathBuf::from("logs/report.log")
}

fn default_history_log() -> PathBuf {
    PathBuf::from("logs/history.log")
}

fn default_heartbeat_file() -> PathBuf {
    PathBuf::from(".heartbeat")
}

/// Settings after environment overrides, reduced to what a run needs.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Complete credentials, or `None` when delivery is off or misconfigured
    pub mailgun: Option<MailgunConfig>,
    pub heartbeat_every: Option<u64>,
    pub allow_redirects: bool,
    pub request_timeout: Duration,
    pub accept_invalid_certs: bool,
    pub report_log: PathBuf,
    pub history_log: PathBuf,
    pub heartbeat_file: PathBuf,
}

/// Complete Mailgun credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailgunConfig {
    pub recipient: String,
    pub sender: String,
    pub api_key: String,
    pub domain: String,
}

impl Config {
    /// Apply environment overrides and reduce to the run settings.
    pub fn resolve(self) -> ResolvedConfig {
        self.resolve_with_env(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::resolve`] with the environment injected, so tests
    /// don't have to mutate the process environment.
    pub fn resolve_with_env(mut self, env: impl Fn(&str) -> Option<String>) -> ResolvedConfig {
        if let Some(value) = env("MAILGUN_TO") {
            self.mailgun_to = Some(value);
        }
        if let Some(value) = env("MAILGUN_FROM") {
            self.mailgun_from = Some(value);
        }
        if let Some(value) = env("MAILGUN_API_KEY") {
            self.mailgun_api_key = Some(value);
        }
        if let Some(value) = env("MAILGUN_DOMAIN") {
            self.mailgun_domain = Some(value);
        }
        if let Some(value) = env("USE_MAILGUN") {
            match parse_bool(&value) {
                Some(flag) => self.use_mailgun = flag,
                None => warn!("ignoring unparseable USE_MAILGUN value: '{value}'"),
            }
        }
        if let Some(value) = env("HEARTBEAT_EVERY") {
            match value.trim().parse::<u64>() {
                Ok(secs) => self.heartbeat_every = Some(secs),
                Err(_) => warn!("ignoring unparseable HEARTBEAT_EVERY value: '{value}'"),
            }
        }
        if let Some(value) = env("ALLOW_REDIRECTS") {
            match parse_bool(&value) {
                Some(flag) => self.allow_redirects = flag,
                None => warn!("ignoring unparseable ALLOW_REDIRECTS value: '{value}'"),
            }
        }

        let mailgun = self.mailgun();

        ResolvedConfig {
            mailgun,
            // 0 disables heartbeats just like an absent setting.
            heartbeat_every: self.heartbeat_every.filter(|&secs| secs > 0),
            allow_redirects: self.allow_redirects,
            request_timeout: Duration::from_secs(self.request_timeout),
            accept_invalid_certs: self.accept_invalid_certs,
            report_log: self.report_log,
            history_log: self.history_log,
            heartbeat_file: self.heartbeat_file,
        }
    }

    fn mailgun(&self) -> Option<MailgunConfig> {
        if !self.use_mailgun {
            return None;
        }

        match (
            self.mailgun_to.as_deref(),
            self.mailgun_from.as_deref(),
            self.mailgun_api_key.as_deref(),
            self.mailgun_domain.as_deref(),
        ) {
            (Some(recipient), Some(sender), Some(api_key), Some(domain))
                if !(recipient.is_empty()
                    || sender.is_empty()
                    || api_key.is_empty()
                    || domain.is_empty()) =>
            {
                Some(MailgunConfig {
                    recipient: recipient.to_owned(),
                    sender: sender.to_owned(),
                    api_key: api_key.to_owned(),
                    domain: domain.to_owned(),
                })
            }
            _ => {
                warn!("Unable to configure Mailgun. E-mails won't be sent.");
                None
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn read_config_file(path: &Path) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}

pub fn read_watchlist_file(path: &Path) -> anyhow::Result<Vec<CheckSpec>> {
    let file_content = std::fs::read_to_string(path)?;
    let entries: BTreeMap<String, CheckRules> = serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid watchlist file provided!"))?;

    let mut specs = Vec::with_capacity(entries.len());
    for (target, rules) in entries {
        if target.trim().is_empty() {
            bail!("watchlist entries must name a target URL");
        }
        specs.push(CheckSpec::resolve(target, rules));
    }

    trace!("loaded {} watchlist entries", specs.len());
    Ok(specs)
}
