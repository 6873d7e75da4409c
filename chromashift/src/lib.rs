// chromashift/src/lib.rs
//! # ChromaShift CLI
//!
//! Wraps a command, finds the coloring rules configured for it and colorizes
//! its output on the fly. The colorization itself lives in
//! `chromashift-core`; this crate handles arguments, process plumbing,
//! terminal detection and the `list` / `alias` helpers.
//!
//! License: MIT OR APACHE 2.0

pub mod cli;
pub mod commands;
pub mod logger;
pub mod utils;

pub use commands::dispatch;
