use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("missing mailer configuration: {0}")]
    MissingConfig(&'static str),

    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected the send ({status}): {body}")]
    Provider { status: u16, body: String },
}
