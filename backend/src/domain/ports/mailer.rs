//! Driven port for outbound account emails (verification codes, reset links).

use async_trait::async_trait;

use crate::domain::EmailAddress;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail delivery adapters.
    pub enum MailerError {
        /// The message could not be handed to the transport.
        Delivery { message: String } => "email delivery failed: {message}",
    }
}

/// Plain-text message addressed to a single account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
}

/// Mail transport.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email`.
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}
