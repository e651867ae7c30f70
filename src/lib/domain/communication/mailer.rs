//! Mailer module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{ComposedMessage, ResolvedResource};

/// Outbound email transport
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The [`ComposedMessage`] to send, including its inline resources.
    ///
    /// # Returns
    /// A [`Result`] indicating whether the transport accepted the message.
    /// Failures are reported once and never retried.
    async fn send_email(&self, message: &ComposedMessage) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, message: &ComposedMessage) -> Result<(), MailerError>;
    }
}

/// Test doubles for the mailer
#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;
}
