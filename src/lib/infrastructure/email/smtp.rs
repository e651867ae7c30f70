//! SMTP mailer implementation

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{ComposedMessage, Mailer, MailerError},
};

/// Content type of inline resources whose type could not be inferred
const OCTET_STREAM: &str = "application/octet-stream";

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD")]
    pub password: String,

    /// Verify the TLS certificate
    #[clap(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub verify_tls: bool,

    /// Upgrade the connection with STARTTLS; when disabled the connection is
    /// wrapped in TLS from the start (implicit TLS, usually port 465)
    #[clap(
        long = "smtp-starttls",
        env = "SMTP_STARTTLS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Create the SMTP transport described by the configuration
    pub fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
                .port(self.config.port)
                .credentials(creds)
                .tls(self.tls()?)
                .build(),
        )
    }

    /// The TLS mode of the connection; never falls back to plaintext
    fn tls(&self) -> Result<Tls> {
        let parameters = TlsParameters::builder(self.config.host.clone())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()?;

        if self.config.starttls {
            Ok(Tls::Required(parameters))
        } else {
            Ok(Tls::Wrapper(parameters))
        }
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(&self, message: &ComposedMessage) -> Result<(), MailerError> {
        let email = build_message(message)?;

        match self.transport()?.send(email).await {
            Ok(response) => {
                debug!("SMTP server responded with {:?}", response.code());

                Ok(())
            }
            Err(e) => Err(MailerError::SendError(e.into())),
        }
    }
}

/// Builds a `multipart/related` email with one inline attachment per resource
pub fn build_message(message: &ComposedMessage) -> Result<Message, MailerError> {
    let mut builder = Message::builder()
        .from(Mailbox::new(
            message.from_name.clone(),
            message.from.as_str().parse()?,
        ))
        .subject(message.subject.clone());

    if let Some(reply_to) = &message.reply_to {
        builder = builder.reply_to(mailbox(reply_to)?);
    }

    for to in &message.to {
        builder = builder.to(mailbox(to)?);
    }

    for bcc in &message.bcc {
        builder = builder.bcc(mailbox(bcc)?);
    }

    let mut body = MultiPart::related().singlepart(SinglePart::html(message.html_body.clone()));

    for resource in &message.resources {
        body = body.singlepart(
            Attachment::new_inline(resource.reference_id.clone())
                .body(resource.bytes.clone(), content_type(&resource.content_type)?),
        );
    }

    Ok(builder.multipart(body)?)
}

fn mailbox(address: &EmailAddress) -> Result<Mailbox, MailerError> {
    Ok(Mailbox::new(None, address.as_str().parse()?))
}

fn content_type(raw: &str) -> Result<ContentType, MailerError> {
    ContentType::parse(raw)
        .or_else(|_| ContentType::parse(OCTET_STREAM))
        .map_err(|e| MailerError::UnknownError(anyhow!("invalid content type: {}", e)))
}
