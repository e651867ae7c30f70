//! Error types for rendering, inlining, composing and dispatching notifications

use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// Errors raised while rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template is registered under the given name
    #[error("template \"{0}\" not found")]
    TemplateNotFound(String),

    /// The template engine failed to render the template
    #[error("could not render template \"{name}\"")]
    RenderError {
        /// The name of the template
        name: String,

        /// The engine-specific cause
        #[source]
        source: anyhow::Error,
    },
}

/// Errors raised while embedding the images of a rendered body
#[derive(Debug, Error)]
pub enum InlineError {
    /// An embedded data URI carries a malformed base64 payload
    #[error("could not decode embedded image \"{reference}\"")]
    DataUriDecode {
        /// The offending `src` value
        reference: String,

        /// The decoding failure
        #[source]
        source: base64::DecodeError,
    },

    /// A referenced local image does not exist
    #[error("local resource \"{0}\" not found")]
    LocalResourceNotFound(String),

    /// A referenced local image points outside the resource root
    #[error("local resource \"{0}\" is outside the resource root")]
    ResourceOutsideRoot(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors raised while composing a message; causes are passed through unchanged
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Rendering failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Embedding images failed
    #[error(transparent)]
    Inline(#[from] InlineError),

    /// Inlining stylesheets failed
    #[error("could not inline styles")]
    Styling(#[source] css_inline::InlineError),
}

impl From<css_inline::InlineError> for ComposeError {
    fn from(err: css_inline::InlineError) -> Self {
        debug!("css_inline::InlineError -> ComposeError");

        ComposeError::Styling(err)
    }
}

/// The reason a notification could not be delivered
#[derive(Debug, Error)]
pub enum DeliveryFailure {
    /// The message could not be composed
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// The mailer rejected the message
    #[error(transparent)]
    Mailer(#[from] MailerError),
}

/// A notification could not be delivered
#[derive(Debug, Error)]
#[error("notification could not be delivered")]
pub struct NotificationDeliveryError {
    /// The original cause
    #[source]
    pub cause: DeliveryFailure,
}

impl From<ComposeError> for NotificationDeliveryError {
    fn from(err: ComposeError) -> Self {
        debug!("ComposeError -> NotificationDeliveryError");

        Self { cause: err.into() }
    }
}

impl From<MailerError> for NotificationDeliveryError {
    fn from(err: MailerError) -> Self {
        debug!("MailerError -> NotificationDeliveryError");

        Self { cause: err.into() }
    }
}
