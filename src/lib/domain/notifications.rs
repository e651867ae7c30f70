//! Notifications: render a template, embed its images and dispatch the result.

mod composer;
mod config;
mod dispatcher;
mod inliner;
mod renderer;
mod request;
mod resolver;

pub mod errors;
pub mod mime;

pub use composer::NotificationComposer;
pub use config::NotificationConfig;
pub use dispatcher::{DispatchMode, Dispatcher};
pub use inliner::{InlinedHtml, ResourceInliner};
pub use renderer::{TemplateEngine, TemplateRenderer};
pub use request::{NotificationRequest, TemplateParams};
pub use resolver::ResourceResolver;
