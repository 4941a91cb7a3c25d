//! Mail transport boundary.
//!
//! [`MailTransport`] is what the [`DeliverySender`](crate::DeliverySender)
//! talks to. Production uses [`SmtpMailer`](email::SmtpMailer); when SMTP
//! is not configured, [`LogMailer`] only writes the message to the log.

pub mod email;

use std::sync::Arc;

use async_trait::async_trait;

use email::{EmailConfig, EmailError, SmtpMailer};

/// Sends one plain-text message to one recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Transport that logs messages instead of sending them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl MailTransport for LogMailer {
    async fn send_mail(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        tracing::info!(to, subject, body_len = body.len(), "SMTP not configured, mail logged only");
        Ok(())
    }
}

/// Build the transport described by the environment.
///
/// Uses SMTP when `SMTP_HOST` is set, otherwise [`LogMailer`].
pub fn mailer_from_env() -> Result<Arc<dyn MailTransport>, EmailError> {
    match EmailConfig::from_env() {
        Some(config) => {
            tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP mail transport enabled");
            Ok(Arc::new(SmtpMailer::new(config)?))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, notifications will be logged instead of mailed");
            Ok(Arc::new(LogMailer))
        }
    }
}
