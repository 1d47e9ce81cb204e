//! Mailgun delivery
//!
//! Composition is separate from delivery: [`NotificationRequest::compose`]
//! turns a policy decision into the message to send (or nothing), the
//! [`Notifier`] trait carries it out. Delivery failures are logged and
//! swallowed; an unreachable mail API must not fail the run.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, instrument};

use crate::config::MailgunConfig;
use crate::notify::policy::Decision;
use crate::report::RunReport;

pub const MAILGUN_API_BASE: &str = "https://api.mailgun.net/v3";

/// A fully composed notification, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl NotificationRequest {
    /// Turn a policy decision into a message, or nothing for
    /// [`Decision::None`].
    pub fn compose(decision: Decision, recipient: &str, report: &RunReport) -> Option<Self> {
        let subject = match decision {
            Decision::None => return None,
            Decision::Alert => "Website monitor: errors detected",
            Decision::Heartbeat => "Website monitor: all clear",
        };

        Some(Self {
            recipient: recipient.to_owned(),
            subject: subject.to_owned(),
            body: format!("Status report:\n{}", report.render()),
        })
    }
}

/// Delivery channel for composed notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, request: &NotificationRequest);
}

/// Sends notifications through the Mailgun messages API.
#[derive(Debug, Clone)]
pub struct MailgunNotifier {
    client: Client,
    config: MailgunConfig,
    api_base: String,
}

impl MailgunNotifier {
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            api_base: MAILGUN_API_BASE.to_owned(),
        }
    }

    /// Point the notifier at a different API host. Mailgun's EU region
    /// lives on `https://api.eu.mailgun.net/v3`.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl Notifier for MailgunNotifier {
    #[instrument(skip_all, fields(recipient = %request.recipient))]
    async fn send(&self, request: &NotificationRequest) {
        let url = format!("{}/{}/messages", self.api_base, self.config.domain);
        let form = [
            ("from", self.config.sender.as_str()),
            ("to", request.recipient.as_str()),
            ("subject", request.subject.as_str()),
            ("text", request.body.as_str()),
        ];

        match self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => {
                if response.status().is_success() {
                    info!("Successfully sent mail to {}", request.recipient);
                } else {
                    error!("Mailgun request failed with status: {}", response.status());
                }
            }
            Err(e) => {
                error!("Failed to reach Mailgun: {}", e);
            }
        }
    }
}
