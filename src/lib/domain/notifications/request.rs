//! Notification request

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::domain::communication::email_addresses::EmailAddress;

/// Parameters handed to a template, keyed by name
pub type TemplateParams = Map<String, Value>;

/// A request to send a templated notification
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationRequest {
    /// The recipients; nothing is sent when empty
    pub to: BTreeSet<EmailAddress>,

    /// The sender, falls back to the configured default sender
    pub from: Option<EmailAddress>,

    /// The display name of the sender
    pub from_name: Option<String>,

    /// The address replies should go to
    pub reply_to: Option<EmailAddress>,

    /// Extra blind carbon copy recipients
    pub bcc: BTreeSet<EmailAddress>,

    /// Send a blind copy to the reply-to (or sender) address
    pub copy_to_sender: bool,

    /// The subject, substituted into the configured subject format
    pub subject: String,

    /// The logical name of the template to render
    pub template: String,

    /// The template parameters
    pub params: TemplateParams,
}
