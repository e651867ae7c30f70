//! Notification composer

use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::domain::{
    communication::mailer::ComposedMessage,
    notifications::{
        config::NotificationConfig,
        errors::ComposeError,
        inliner::ResourceInliner,
        renderer::{TemplateEngine, TemplateRenderer},
        request::NotificationRequest,
        resolver::ResourceResolver,
    },
};

/// Assembles [`ComposedMessage`]s from [`NotificationRequest`]s
#[derive(Debug)]
pub struct NotificationComposer<E, R>
where
    E: TemplateEngine,
    R: ResourceResolver,
{
    config: Arc<NotificationConfig>,
    renderer: TemplateRenderer<E>,
    inliner: ResourceInliner<R>,
}

impl<E, R> NotificationComposer<E, R>
where
    E: TemplateEngine,
    R: ResourceResolver,
{
    /// Creates a new composer
    pub fn new(
        config: Arc<NotificationConfig>,
        renderer: TemplateRenderer<E>,
        inliner: ResourceInliner<R>,
    ) -> Self {
        Self {
            config,
            renderer,
            inliner,
        }
    }

    /// Returns the configuration the composer was built with
    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Renders the request's template, embeds its images and resolves the addresses.
    ///
    /// # Arguments
    /// * `request` - The [`NotificationRequest`] to compose.
    ///
    /// # Returns
    /// - [`Ok`] with the [`ComposedMessage`].
    /// - [`Err`] with the renderer's or inliner's error, unchanged.
    pub async fn compose(
        &self,
        request: &NotificationRequest,
    ) -> Result<ComposedMessage, ComposeError> {
        let mut html = self.renderer.render(&request.template, &request.params)?;

        if self.config.inline_css {
            html = css_inline::inline(&html)?;
        }

        let inlined = self.inliner.inline(&html).await?;

        let from = request
            .from
            .clone()
            .unwrap_or_else(|| self.config.default_sender.clone());

        let from_name = request
            .from_name
            .clone()
            .filter(|name| !name.trim().is_empty());

        // The default sender is never copied, only an explicit reply-to or from.
        let sender = request.reply_to.as_ref().or(request.from.as_ref());

        let mut bcc = BTreeSet::new();

        if request.copy_to_sender {
            if let Some(sender) = sender {
                bcc.insert(sender.clone());
            }
        }

        bcc.extend(request.bcc.iter().cloned());

        debug!(
            "composed \"{}\" for {} recipients with {} inline resources",
            request.template,
            request.to.len(),
            inlined.resources.len()
        );

        Ok(ComposedMessage {
            subject: self.config.subject(&request.subject),
            from,
            from_name,
            reply_to: request.reply_to.clone(),
            to: request.to.clone(),
            bcc,
            html_body: inlined.html,
            resources: inlined.resources,
        })
    }
}
