// chromashift/src/utils/mod.rs
//! Process and terminal helpers for the chromashift binary.
//!
//! License: MIT OR APACHE 2.0

pub mod signals;
pub mod terminal;
