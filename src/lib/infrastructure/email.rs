//! Email transports.

pub mod smtp;
