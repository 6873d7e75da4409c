// chromashift-core/src/engines/mod.rs
//! Colorization engine implementations.
//!
//! Each engine lives in its own file and implements `ColorizationEngine`.
//!
//! License: MIT OR APACHE 2.0

pub mod regex_engine;
