//! Template engines.

pub mod askama_engine;
