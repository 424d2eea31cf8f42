//! Console fallback for the `Mailer` port.
//!
//! No transport is configured, so messages are emitted as structured `info`
//! events that an operator can read from the service log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{Mailer, MailerError, OutboundEmail};

/// Mailer that writes each message to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        info!(
            recipient = %email.recipient,
            subject = %email.subject,
            body = %email.body,
            "outbound email (no transport configured)"
        );
        Ok(())
    }
}
