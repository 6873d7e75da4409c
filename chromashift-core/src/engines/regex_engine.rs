// chromashift-core/src/engines/regex_engine.rs
//! A `ColorizationEngine` driven by the regex rules of a rules file.
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use crate::compositor::StyleSpan;
use crate::config::RuleSet;
use crate::engine::ColorizationEngine;
use crate::matcher;
use crate::path_style::{LsColorsStyler, PathStyler};
use crate::rules::{get_or_compile_rules, CompiledRules};

pub struct RegexEngine {
    compiled_rules: Arc<CompiledRules>,
    rule_set: RuleSet,
    path_styler: Box<dyn PathStyler>,
}

impl RegexEngine {
    /// Builds an engine that styles `path` tokens from `LS_COLORS`.
    pub fn new(rule_set: RuleSet) -> Self {
        Self::with_path_styler(rule_set, Box::new(LsColorsStyler::from_env()))
    }

    pub fn with_path_styler(rule_set: RuleSet, path_styler: Box<dyn PathStyler>) -> Self {
        let compiled_rules = get_or_compile_rules(&rule_set);
        Self { compiled_rules, rule_set, path_styler }
    }
}

impl fmt::Debug for RegexEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegexEngine")
            .field("rules", &self.compiled_rules.rules.len())
            .field("stderr", &self.rule_set.stderr)
            .field("pty", &self.rule_set.pty)
            .finish()
    }
}

impl ColorizationEngine for RegexEngine {
    fn find_spans(&self, text: &str) -> Vec<StyleSpan> {
        matcher::find_spans(text, &self.compiled_rules.rules, self.path_styler.as_ref())
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodingRule;
    use crate::path_style::NoPathStyle;

    #[test]
    fn test_engine_colorizes_unit() {
        let rule_set = RuleSet {
            rules: vec![CodingRule {
                regexp: "world".to_string(),
                colors: "red".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let engine = RegexEngine::with_path_styler(rule_set, Box::new(NoPathStyle));
        assert_eq!(engine.colorize("hello world"), "hello \x1b[31mworld\x1b[0m");
        assert_eq!(engine.colorize("nothing here"), "nothing here");
        assert_eq!(engine.compiled_rules().rules.len(), 1);
    }
}
