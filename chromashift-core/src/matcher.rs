// chromashift-core/src/matcher.rs
//! Produces styled spans for one unit of text from ordered rules.
//!
//! Rules are evaluated in the order they are given. Every capture group of
//! every match contributes a span styled by the rule's color entry for that
//! group. A matching overwrite rule throws away whatever was collected before
//! it and stops evaluation, so its spans are the only ones rendered.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::compositor::StyleSpan;
use crate::path_style::PathStyler;
use crate::rules::CompiledRule;

/// Where rule evaluation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// About to evaluate the rule at this index.
    Evaluating(usize),
    /// An overwrite rule matched; its spans are final.
    Overwritten,
    /// Every rule was evaluated.
    Done,
}

/// Spans found for a unit and the state evaluation finished in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub spans: Vec<StyleSpan>,
    pub state: MatchState,
}

/// Runs the rules over `text` and returns the spans to render.
pub fn find_spans(text: &str, rules: &[CompiledRule], styler: &dyn PathStyler) -> Vec<StyleSpan> {
    evaluate(text, rules, styler).spans
}

/// Like [`find_spans`], also reporting the terminal state.
pub fn evaluate(text: &str, rules: &[CompiledRule], styler: &dyn PathStyler) -> MatchOutcome {
    let mut spans = Vec::new();
    let mut state = MatchState::Evaluating(0);

    while let MatchState::Evaluating(index) = state {
        state = match rules.get(index) {
            None => MatchState::Done,
            Some(rule) => {
                let (matched, rule_spans) = rule_spans(text, rule, styler);
                if matched && rule.overwrite {
                    debug!("Overwrite rule '{}' discards other rules for this unit", rule.regex.as_str());
                    spans = rule_spans;
                    MatchState::Overwritten
                } else {
                    spans.extend(rule_spans);
                    MatchState::Evaluating(index + 1)
                }
            }
        };
    }

    MatchOutcome { spans, state }
}

/// Spans for one rule, and whether its pattern matched at all.
fn rule_spans(text: &str, rule: &CompiledRule, styler: &dyn PathStyler) -> (bool, Vec<StyleSpan>) {
    let mut matched = false;
    let mut spans = Vec::new();

    for caps in rule.regex.captures_iter(text) {
        matched = true;
        for (group, m) in caps.iter().enumerate() {
            let Some(m) = m else { continue };
            if m.start() == m.end() {
                continue;
            }
            let style = rule
                .style_for_group(group)
                .and_then(|spec| spec.resolve(m.as_str(), styler));
            if let Some(style) = style {
                spans.push(StyleSpan::new(m.start(), m.end(), style));
            }
        }
    }

    (matched, spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::render;
    use crate::config::CodingRule;
    use crate::path_style::NoPathStyle;
    use crate::rules::compile_rules;

    fn rule(regexp: &str, colors: &str, overwrite: bool) -> CodingRule {
        CodingRule {
            regexp: regexp.to_string(),
            colors: colors.to_string(),
            overwrite,
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_take_cycled_colors() {
        let compiled = compile_rules(&[rule(r"(\w+)=(\w+)", "bold,red,green", false)]);
        let spans = find_spans("key=value", &compiled.rules, &NoPathStyle);
        assert_eq!(
            spans,
            vec![
                StyleSpan::new(0, 9, "1"),
                StyleSpan::new(0, 3, "31"),
                StyleSpan::new(4, 9, "32"),
            ]
        );
    }

    #[test]
    fn test_empty_entries_and_zero_width_groups_emit_nothing() {
        let compiled = compile_rules(&[rule(r"a(x?)(b)", ",red,blue", false)]);
        let spans = find_spans("ab", &compiled.rules, &NoPathStyle);
        assert_eq!(spans, vec![StyleSpan::new(1, 2, "34")]);
    }

    #[test]
    fn test_every_non_overlapping_match_is_styled() {
        let compiled = compile_rules(&[rule(r"\d+", "yellow", false)]);
        let outcome = evaluate("1 22 333", &compiled.rules, &NoPathStyle);
        assert_eq!(outcome.spans.len(), 3);
        assert_eq!(outcome.state, MatchState::Done);
    }

    #[test]
    fn test_overwrite_short_circuits() {
        let compiled = compile_rules(&[
            rule("hello", "red", false),
            rule("world", "blue", true),
            rule("hello", "green", false),
        ]);
        let outcome = evaluate("hello world", &compiled.rules, &NoPathStyle);
        assert_eq!(outcome.state, MatchState::Overwritten);
        assert_eq!(outcome.spans, vec![StyleSpan::new(6, 11, "34")]);
        assert_eq!(
            render("hello world", &outcome.spans).unwrap(),
            "hello \x1b[34mworld\x1b[0m"
        );
    }

    #[test]
    fn test_unmatched_overwrite_rule_keeps_other_spans() {
        let compiled = compile_rules(&[rule("hello", "red", false), rule("nothing", "blue", true)]);
        let outcome = evaluate("hello world", &compiled.rules, &NoPathStyle);
        assert_eq!(outcome.state, MatchState::Done);
        assert_eq!(outcome.spans, vec![StyleSpan::new(0, 5, "31")]);
    }

    #[test]
    fn test_no_rules_is_done_without_spans() {
        let outcome = evaluate("text", &[], &NoPathStyle);
        assert_eq!(outcome.state, MatchState::Done);
        assert!(outcome.spans.is_empty());
    }
}
