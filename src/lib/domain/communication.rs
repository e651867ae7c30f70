//! Communication module: addresses, messages and the mailer boundary.

pub mod email_addresses;
pub mod mailer;
