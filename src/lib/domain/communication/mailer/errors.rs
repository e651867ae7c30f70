//! Mailer errors

use lettre::{address::AddressError, error::Error};
use thiserror::Error;
use tracing::debug;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport rejected the email
    #[error("An error occurred while sending the email")]
    SendError(#[source] anyhow::Error),

    /// Invalid email address
    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        debug!("AddressError -> MailerError: {:?}", err);

        MailerError::InvalidEmail
    }
}

impl From<Error> for MailerError {
    fn from(err: Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
