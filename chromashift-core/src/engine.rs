// chromashift-core/src/engine.rs
//! Defines the core ColorizationEngine trait.
//!
//! The trait is the seam between stream plumbing and the way spans are
//! found. The writer and headless helpers only ever see a
//! `dyn ColorizationEngine`, so another span producer can be swapped in
//! without touching them.
//!
//! License: MIT OR APACHE 2.0

use crate::compositor::{self, StyleSpan};
use crate::config::RuleSet;
use crate::rules::CompiledRules;

/// Finds styled spans in a unit of text and renders them.
pub trait ColorizationEngine: Send + Sync {
    /// Spans for one unit, in evaluation order.
    fn find_spans(&self, text: &str) -> Vec<StyleSpan>;

    /// Styled rendering of one unit. Never fails: when rendering is not
    /// possible the unit comes back unchanged.
    fn colorize(&self, text: &str) -> String {
        let spans = self.find_spans(text);
        compositor::colorize(text, &spans)
    }

    /// The compiled rules the engine evaluates.
    fn compiled_rules(&self) -> &CompiledRules;

    /// The rule set the engine was built from.
    fn rule_set(&self) -> &RuleSet;
}
