//! Recording [`Mailer`] for tests. Stores every message instead of sending
//! it, and can be told to fail sends to specific recipients.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::MailerError;
use crate::{BoxFuture, EmailMessage, Mailer};

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message accepted so far, in send order.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// Make every send to `recipient` fail with a provider error.
    pub fn fail_sends_to(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .expect("mailer lock poisoned")
            .insert(recipient.to_string());
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: EmailMessage) -> BoxFuture<'_, Result<String, MailerError>> {
        Box::pin(async move {
            let failing = self
                .failing_recipients
                .lock()
                .expect("mailer lock poisoned")
                .contains(&message.to);
            if failing {
                return Err(MailerError::Provider {
                    status: 500,
                    body: "simulated provider outage".to_string(),
                });
            }

            let mut sent = self.sent.lock().expect("mailer lock poisoned");
            sent.push(message);
            Ok(format!("delivery-{}", sent.len()))
        })
    }
}
