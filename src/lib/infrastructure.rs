//! Adapters for the external collaborators of the domain.

pub mod email;
pub mod resources;
pub mod templates;
