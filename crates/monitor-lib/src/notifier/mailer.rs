//! Email delivery
//!
//! The notifier talks to a [`Mailer`]; production uses AWS SES v2.

use async_trait::async_trait;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use thiserror::Error;

use super::message::AlertEmail;

/// Errors raised while handing an email to the gateway
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SENDER_EMAIL is not configured")]
    MissingSender,

    #[error("no recipients configured")]
    NoRecipients,

    #[error("failed to build email: {0}")]
    Build(#[from] aws_sdk_sesv2::error::BuildError),

    #[error("email gateway rejected the message: {0}")]
    Delivery(String),
}

/// Outbound email gateway
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one alert email, returning the gateway's message id
    async fn send(&self, email: &AlertEmail) -> Result<String, MailerError>;
}

/// Split a comma-separated recipient list, dropping blanks
pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Mailer backed by AWS SES v2
pub struct SesMailer {
    client: aws_sdk_sesv2::Client,
    sender: Option<String>,
    recipients: Vec<String>,
}

impl SesMailer {
    /// Build a client for `region` using the default AWS credential chain
    ///
    /// A missing sender is accepted here and reported on the first send.
    pub async fn new(region: &str, sender: Option<String>, recipients: Vec<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_sesv2::Client::new(&config),
            sender,
            recipients,
        }
    }

    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

fn utf8(data: &str) -> Result<Content, MailerError> {
    Ok(Content::builder().data(data).charset("UTF-8").build()?)
}

/// Subject plus text and HTML parts, all UTF-8
fn simple_message(email: &AlertEmail) -> Result<Message, MailerError> {
    let body = Body::builder()
        .text(utf8(&email.text_body)?)
        .html(utf8(&email.html_body)?)
        .build();

    Ok(Message::builder()
        .subject(utf8(&email.subject)?)
        .body(body)
        .build())
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: &AlertEmail) -> Result<String, MailerError> {
        let sender = self.sender.as_deref().ok_or(MailerError::MissingSender)?;
        if self.recipients.is_empty() {
            return Err(MailerError::NoRecipients);
        }

        let message = simple_message(email)?;

        let output = self
            .client
            .send_email()
            .from_email_address(sender)
            .destination(
                Destination::builder()
                    .set_to_addresses(Some(self.recipients.clone()))
                    .build(),
            )
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| {
                MailerError::Delivery(aws_sdk_sesv2::error::DisplayErrorContext(&e).to_string())
            })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
