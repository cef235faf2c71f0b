//! Codex prefix-rule compilation and rendering.
//!
//! Flat command lists compile into grouped rules: commands sharing every
//! token but the last collapse into one rule with a bracketed alternation
//! list. The rendered file is regenerated wholesale on every run.

use std::collections::{HashMap, HashSet};

use crate::lists::OrderedSet;
use crate::models::{Config, Decision};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodexRule {
    pub pattern_prefix: Vec<String>,
    /// Last-token alternatives; empty means no alternation.
    pub pattern_alts: Vec<String>,
    pub decision: String,
    pub match_text: String,
}

pub fn build_rules(cfg: &Config) -> Vec<CodexRule> {
    let mut rules = Vec::new();
    for decision in [Decision::Allow, Decision::Ask, Decision::Deny] {
        rules.extend(build_decision_rules(
            decision.codex_name(),
            cfg.bash.list(decision),
        ));
    }
    rules
}

/// Compile one decision category. Single-token commands become their own
/// rule; multi-token commands group by their leading tokens, accumulating
/// last-token alternatives in first-seen order.
pub fn build_decision_rules(decision: &str, commands: &[String]) -> Vec<CodexRule> {
    enum Key {
        Single(String),
        Group(Vec<String>),
    }

    let mut order: Vec<Key> = Vec::new();
    let mut singles: HashSet<String> = HashSet::new();
    let mut groups: HashMap<Vec<String>, OrderedSet> = HashMap::new();

    for cmd in commands {
        let tokens: Vec<String> = cmd.split_whitespace().map(str::to_string).collect();
        let Some((last, prefix)) = tokens.split_last() else {
            continue;
        };
        if prefix.is_empty() {
            if singles.insert(last.clone()) {
                order.push(Key::Single(last.clone()));
            }
            continue;
        }
        let group = groups.entry(prefix.to_vec()).or_insert_with(|| {
            order.push(Key::Group(prefix.to_vec()));
            OrderedSet::new()
        });
        group.insert(last);
    }

    let mut rules = Vec::new();
    for key in order {
        match key {
            Key::Single(token) => rules.push(CodexRule {
                pattern_prefix: vec![token.clone()],
                pattern_alts: Vec::new(),
                decision: decision.to_string(),
                match_text: token,
            }),
            Key::Group(prefix) => {
                let Some(alts) = groups.remove(&prefix).map(OrderedSet::into_vec) else {
                    continue;
                };
                if alts.len() == 1 {
                    let mut full = prefix;
                    full.extend(alts);
                    rules.push(CodexRule {
                        pattern_prefix: full.clone(),
                        pattern_alts: Vec::new(),
                        decision: decision.to_string(),
                        match_text: full.join(" "),
                    });
                } else {
                    let match_text = format!("{} {}", prefix.join(" "), alts[0]);
                    rules.push(CodexRule {
                        pattern_prefix: prefix,
                        pattern_alts: alts,
                        decision: decision.to_string(),
                        match_text,
                    });
                }
            }
        }
    }
    rules
}

pub fn render_rules(rules: &[CodexRule]) -> String {
    let mut out = String::new();
    out.push_str("# ~/.codex/rules/default.rules\n");
    out.push_str("# Generated by permsync. Do not edit by hand.\n\n");
    for (i, rule) in rules.iter().enumerate() {
        out.push_str("prefix_rule(\n");
        out.push_str(&render_pattern(rule));
        out.push_str(&render_decision(&rule.decision));
        out.push_str(&render_match(&rule.match_text));
        out.push_str(")\n");
        if i + 1 < rules.len() {
            out.push('\n');
        }
    }
    out
}

fn render_pattern(rule: &CodexRule) -> String {
    if rule.pattern_alts.is_empty() {
        return format!("  pattern = [{}],\n", join_quoted(&rule.pattern_prefix));
    }
    let mut out = String::new();
    out.push_str("  pattern = [");
    out.push_str(&join_quoted(&rule.pattern_prefix));
    out.push_str(", [\n");
    for alt in &rule.pattern_alts {
        out.push_str(&format!("    {alt:?},\n"));
    }
    out.push_str("  ]],\n");
    out
}

fn render_decision(decision: &str) -> String {
    if decision.is_empty() || decision == "allow" {
        return "  decision = \"allow\",\n".to_string();
    }
    format!("  decision = {decision:?},\n")
}

fn render_match(match_text: &str) -> String {
    if match_text.trim().is_empty() {
        return String::new();
    }
    format!("  match = [{match_text:?}],\n")
}

fn join_quoted(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("{t:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
