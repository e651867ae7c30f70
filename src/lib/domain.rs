//! Domain logic and the boundaries to external collaborators.

pub mod communication;
pub mod notifications;
