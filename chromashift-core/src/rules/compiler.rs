//! compiler.rs - Compilation and caching of coloring rules.
//!
//! Turns the rules of a `RuleSet` into `CompiledRules`: a compiled regex and
//! translated color entries per rule, ready to be applied to every unit of
//! output. Compiled sets are shared through a process-wide cache keyed by a
//! hash of the rule set, so several streams colorized with the same rules
//! compile them once.
//!
//! A rule that cannot be compiled never aborts the set. It is logged and
//! left out, and colorization carries on with the remaining rules.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::config::{CodingRule, RuleSet};
use crate::errors::ChromaError;
use crate::palette::StyleSpec;

/// A single rule ready for matching.
#[derive(Debug)]
pub struct CompiledRule {
    pub regex: Regex,
    /// One entry per capture group, cycled by group index.
    pub styles: Vec<StyleSpec>,
    pub overwrite: bool,
    pub priority: i64,
    pub kind: Option<String>,
}

impl CompiledRule {
    /// Color entry for capture group `group`.
    pub fn style_for_group(&self, group: usize) -> Option<&StyleSpec> {
        if self.styles.is_empty() {
            return None;
        }
        self.styles.get(group % self.styles.len())
    }
}

/// All compiled rules of a rule set, in evaluation order.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
    /// Number of rules left out because they could not be compiled.
    pub skipped: usize,
}

lazy_static! {
    /// Process-wide cache of compiled rule sets, keyed by `hash_rule_set`.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, Arc<CompiledRules>>> = RwLock::new(HashMap::new());
}

/// Rule order is significant for evaluation, so it is part of the key.
fn hash_rule_set(rule_set: &RuleSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    rule_set.rules.hash(&mut hasher);
    hasher.finish()
}

fn compile_rule(index: usize, rule: &CodingRule) -> Result<CompiledRule, ChromaError> {
    let regex = RegexBuilder::new(&rule.regexp)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|e| ChromaError::RuleCompilationError(index, rule.regexp.clone(), e))?;

    Ok(CompiledRule {
        regex,
        styles: StyleSpec::parse_list(&rule.colors),
        overwrite: rule.overwrite,
        priority: rule.priority,
        kind: rule.kind.clone(),
    })
}

/// Compiles rules in the given order, skipping the ones that fail.
pub fn compile_rules(rules: &[CodingRule]) -> CompiledRules {
    debug!("Starting compilation of {} rules.", rules.len());

    let mut compiled = CompiledRules::default();
    for (index, rule) in rules.iter().enumerate() {
        if rule.regexp.is_empty() {
            warn!("Skipping rule #{} because its pattern is empty.", index);
            compiled.skipped += 1;
            continue;
        }
        match compile_rule(index, rule) {
            Ok(rule) => compiled.rules.push(rule),
            Err(e) => {
                warn!("Skipping rule: {}", e);
                compiled.skipped += 1;
            }
        }
    }

    debug!(
        "Finished compiling rules. Total compiled: {}, skipped: {}.",
        compiled.rules.len(),
        compiled.skipped
    );
    compiled
}

/// Returns the compiled form of `rule_set`, compiling it on first use.
pub fn get_or_compile_rules(rule_set: &RuleSet) -> Arc<CompiledRules> {
    let cache_key = hash_rule_set(rule_set);

    if let Ok(cache) = COMPILED_RULES_CACHE.read() {
        if let Some(rules) = cache.get(&cache_key) {
            debug!("Serving compiled rules from cache for key: {}", cache_key);
            return Arc::clone(rules);
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = Arc::new(compile_rules(&rule_set.rules));

    if let Ok(mut cache) = COMPILED_RULES_CACHE.write() {
        cache.insert(cache_key, Arc::clone(&compiled));
    }
    compiled
}
