#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Templated notification dispatcher.
//!
//! Renders an HTML template, embeds local images as inline attachments and
//! hands the composed message to an outbound mailer.

pub mod domain;
pub mod infrastructure;
