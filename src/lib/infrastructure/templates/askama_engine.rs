//! Askama template engine

use askama::Template;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::notifications::{errors::TemplateError, TemplateEngine, TemplateParams};

/// Welcome email template
#[derive(Debug, Deserialize, Template)]
#[template(path = "emails/welcome.html")]
pub struct WelcomeTemplate {
    /// The name of the recipient
    pub name: String,
}

/// General purpose notification template
#[derive(Debug, Deserialize, Template)]
#[template(path = "emails/notification.html")]
pub struct NotificationTemplate {
    /// The heading of the notification
    pub heading: String,

    /// The body of the notification
    pub message: String,

    /// Image shown above the heading, relative to the resource root
    #[serde(default)]
    pub logo: Option<String>,
}

/// Template engine backed by the askama templates compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct AskamaTemplateEngine;

impl AskamaTemplateEngine {
    /// The names of the available templates
    pub const TEMPLATES: [&'static str; 2] = ["welcome", "notification"];
}

impl TemplateEngine for AskamaTemplateEngine {
    fn render(&self, name: &str, params: &TemplateParams) -> Result<String, TemplateError> {
        match name {
            "welcome" => render::<WelcomeTemplate>(name, params),
            "notification" => render::<NotificationTemplate>(name, params),
            _ => Err(TemplateError::TemplateNotFound(name.to_string())),
        }
    }
}

fn render<T>(name: &str, params: &TemplateParams) -> Result<String, TemplateError>
where
    T: Template + DeserializeOwned,
{
    let render_error = |source: anyhow::Error| TemplateError::RenderError {
        name: name.to_string(),
        source,
    };

    let template: T = serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| render_error(e.into()))?;

    debug!("rendering template \"{}\"", name);

    template.render().map_err(|e| render_error(e.into()))
}
