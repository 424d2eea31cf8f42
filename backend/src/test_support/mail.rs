//! Mailer doubles usable from integration tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{Mailer, MailerError, OutboundEmail};

/// Mailer that keeps every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => panic!("recording mailer mutex"),
        }
    }

    /// Most recent message addressed to `recipient`.
    pub fn last_to(&self, recipient: &str) -> Option<OutboundEmail> {
        self.sent()
            .into_iter()
            .rev()
            .find(|email| email.recipient.as_ref() == recipient)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        match self.sent.lock() {
            Ok(mut sent) => sent.push(email),
            Err(_) => panic!("recording mailer mutex"),
        }
        Ok(())
    }
}

/// Mailer whose transport is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<(), MailerError> {
        Err(MailerError::delivery("transport offline"))
    }
}
