//! Email message

use std::collections::BTreeSet;

use crate::domain::communication::email_addresses::EmailAddress;

/// A resource shipped inline alongside the HTML body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedResource {
    /// The content-id the HTML body refers to, without the `cid:` prefix
    pub reference_id: String,

    /// The raw bytes of the resource
    pub bytes: Vec<u8>,

    /// The content type, empty when it could not be inferred
    pub content_type: String,
}

/// A fully composed email message, ready to be handed to a [`Mailer`](super::Mailer)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedMessage {
    /// The subject of the email
    pub subject: String,

    /// The sender of the email
    pub from: EmailAddress,

    /// The display name of the sender
    pub from_name: Option<String>,

    /// The address replies should go to
    pub reply_to: Option<EmailAddress>,

    /// The recipients of the email
    pub to: BTreeSet<EmailAddress>,

    /// The blind carbon copy recipients of the email
    pub bcc: BTreeSet<EmailAddress>,

    /// The HTML body, with inline images referenced by content-id
    pub html_body: String,

    /// The inline resources, in order of first appearance in the body
    pub resources: Vec<ResolvedResource>,
}
