// chromashift-core/src/rules/mod.rs
//! Compiled coloring rules.
//!
//! License: MIT OR APACHE 2.0

pub mod compiler;

pub use compiler::{compile_rules, get_or_compile_rules, CompiledRule, CompiledRules};
