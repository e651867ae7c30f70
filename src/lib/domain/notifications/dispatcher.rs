//! Notification dispatcher

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::{
    communication::mailer::{ComposedMessage, Mailer},
    notifications::{
        composer::NotificationComposer, errors::NotificationDeliveryError,
        renderer::TemplateEngine, request::NotificationRequest, resolver::ResourceResolver,
    },
};

/// How a notification is handed to the mailer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// Wait for the mailer to accept or reject the message
    #[default]
    Sync,

    /// Send on a background task; failures are only logged
    Async,
}

/// Composes notifications and hands them to a [`Mailer`]
#[derive(Debug)]
pub struct Dispatcher<E, R, M>
where
    E: TemplateEngine,
    R: ResourceResolver,
    M: Mailer,
{
    composer: Arc<NotificationComposer<E, R>>,
    mailer: Arc<M>,
}

impl<E, R, M> Clone for Dispatcher<E, R, M>
where
    E: TemplateEngine,
    R: ResourceResolver,
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            composer: Arc::clone(&self.composer),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<E, R, M> Dispatcher<E, R, M>
where
    E: TemplateEngine,
    R: ResourceResolver,
    M: Mailer,
{
    /// Creates a new dispatcher
    pub fn new(composer: Arc<NotificationComposer<E, R>>, mailer: Arc<M>) -> Self {
        Self { composer, mailer }
    }

    /// Renders, composes and sends a notification.
    ///
    /// Does nothing when notifications are disabled or the request has no
    /// recipients.
    ///
    /// # Arguments
    /// * `request` - The [`NotificationRequest`] to send.
    /// * `mode` - Whether to wait for the mailer or send on a background task.
    ///
    /// # Returns
    /// - [`Ok`] once the mailer accepted the message, the request was skipped,
    ///   or the send was handed to a background task.
    /// - [`Err`] with a [`NotificationDeliveryError`] in [`DispatchMode::Sync`] if composing or
    ///   sending failed.
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
        mode: DispatchMode,
    ) -> Result<(), NotificationDeliveryError> {
        if !self.should_send(request.to.is_empty()) {
            return Ok(());
        }

        match mode {
            DispatchMode::Sync => self.compose_and_send(&request).await,
            DispatchMode::Async => {
                let dispatcher = self.clone();

                tokio::spawn(async move {
                    if let Err(e) = dispatcher.compose_and_send(&request).await {
                        error!(
                            "could not deliver \"{}\" notification: {:?}",
                            request.template, e
                        );
                    }
                });

                Ok(())
            }
        }
    }

    /// Sends an already composed message, subject to the same checks as [`Dispatcher::dispatch`].
    pub async fn deliver(
        &self,
        message: ComposedMessage,
        mode: DispatchMode,
    ) -> Result<(), NotificationDeliveryError> {
        if !self.should_send(message.to.is_empty()) {
            return Ok(());
        }

        match mode {
            DispatchMode::Sync => self.send(&message).await,
            DispatchMode::Async => {
                let dispatcher = self.clone();

                tokio::spawn(async move {
                    if let Err(e) = dispatcher.send(&message).await {
                        error!("could not deliver \"{}\": {:?}", message.subject, e);
                    }
                });

                Ok(())
            }
        }
    }

    fn should_send(&self, no_recipients: bool) -> bool {
        if !self.composer.config().enabled {
            debug!("notifications are disabled, skipping");

            return false;
        }

        if no_recipients {
            debug!("notification has no recipients, skipping");

            return false;
        }

        true
    }

    async fn compose_and_send(
        &self,
        request: &NotificationRequest,
    ) -> Result<(), NotificationDeliveryError> {
        let message = self.composer.compose(request).await?;

        self.send(&message).await
    }

    async fn send(&self, message: &ComposedMessage) -> Result<(), NotificationDeliveryError> {
        self.mailer.send_email(message).await?;

        info!(
            "sent \"{}\" to {} recipients",
            message.subject,
            message.to.len() + message.bcc.len()
        );

        Ok(())
    }
}
