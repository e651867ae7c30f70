//! Local resource resolvers.

pub mod filesystem;
