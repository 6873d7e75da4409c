// chromashift-core/src/headless.rs
//! Convenience wrappers for one-shot colorization of complete strings.
//!
//! Unlike the stream pipeline, a complete string has no "more to come", so
//! an unterminated last line is colorized as a final unit instead of being
//! dropped.
//!
//! License: MIT OR APACHE 2.0

use crate::config::RuleSet;
use crate::engine::ColorizationEngine;
use crate::engines::regex_engine::RegexEngine;
use crate::segmenter::LineSegmenter;

/// Colorizes `content` with `rule_set`, unit by unit.
pub fn headless_colorize_string(rule_set: RuleSet, content: &str) -> String {
    let engine = RegexEngine::new(rule_set);
    headless_colorize_with(&engine, content)
}

/// Colorizes `content` with an existing engine.
pub fn headless_colorize_with(engine: &dyn ColorizationEngine, content: &str) -> String {
    let mut segmenter = LineSegmenter::new();
    let mut out = String::with_capacity(content.len());

    for unit in segmenter.feed(content.as_bytes()) {
        out.push_str(&engine.colorize(&unit.text));
        out.push(unit.terminator());
    }
    if let Some(tail) = segmenter.finish() {
        out.push_str(&engine.colorize(&tail));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodingRule;

    #[test]
    fn test_headless_colorize_string() {
        let rule_set = RuleSet {
            rules: vec![CodingRule {
                regexp: r"\d+".to_string(),
                colors: "yellow".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let out = headless_colorize_string(rule_set, "a 1\nb 22");
        assert_eq!(out, "a \x1b[33m1\x1b[0m\nb \x1b[33m22\x1b[0m");
    }

    #[test]
    fn test_headless_without_rules_is_identity_modulo_trimming() {
        let out = headless_colorize_string(RuleSet::default(), "plain  \ntext\r");
        assert_eq!(out, "plain\ntext\r");
    }
}
