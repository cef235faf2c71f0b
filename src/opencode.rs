//! Opencode bash permission map generation.
//!
//! Compiles an ordered glob-pattern → decision list and splices it into the
//! `permission.bash` object of `opencode.json`. Ordering is the contract: the
//! catch-all default first, then allow, ask, deny. The consumer evaluates
//! last-match-wins, so a literal may legitimately reappear under a later
//! decision and must not be deduplicated across categories.

use crate::errors::ScanError;
use crate::lists::OrderedSet;
use crate::models::{Config, Decision};
use crate::scan::{self, Span};
use crate::splice::{self, WriteStrategy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpencodeRule {
    pub pattern: String,
    pub decision: String,
}

pub fn build_rules(cfg: &Config) -> Vec<OpencodeRule> {
    let mut default_decision = cfg.opencode.bash.default.trim();
    if default_decision.is_empty() {
        default_decision = "allow";
    }

    let mut rules = vec![OpencodeRule {
        pattern: "*".to_string(),
        decision: default_decision.to_string(),
    }];
    for decision in [Decision::Allow, Decision::Ask, Decision::Deny] {
        rules.extend(build_decision_rules(
            decision,
            cfg.bash.list(decision),
            cfg.opencode.bash.list(decision),
        ));
    }
    rules
}

fn build_decision_rules(
    decision: Decision,
    common: &[String],
    specific: &[String],
) -> Vec<OpencodeRule> {
    let mut values = common.to_vec();
    values.extend_from_slice(specific);
    expand_patterns(&values)
        .into_iter()
        .map(|pattern| OpencodeRule {
            pattern,
            decision: decision.as_str().to_string(),
        })
        .collect()
}

/// Expand literals into pattern pairs: a bare command covers both the exact
/// invocation and any longer one (`git` → `git`, `git *`); anything already
/// carrying a glob metacharacter passes through unchanged. Dedup is
/// first-seen within the one decision category being built.
pub fn expand_patterns(values: &[String]) -> Vec<String> {
    let mut out = OrderedSet::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.insert(trimmed);
        if !contains_wildcard(trimmed) {
            out.insert(&format!("{trimmed} *"));
        }
    }
    out.into_vec()
}

fn contains_wildcard(value: &str) -> bool {
    value.contains(['*', '?'])
}

/// Render the rule list as a JSON object, one pattern per line.
pub fn render_bash_json(rules: &[OpencodeRule]) -> String {
    let mut out = String::from("{\n");
    for (i, rule) in rules.iter().enumerate() {
        out.push_str("  ");
        out.push_str(&json_string(&rule.pattern));
        out.push_str(": ");
        out.push_str(&json_string(&rule.decision));
        if i + 1 < rules.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).expect("string serialize")
}

/// Splice the rendered map into `contents`, between markers when present,
/// else over the value of `permission.bash`.
pub fn update_contents(contents: &str, rules: &[OpencodeRule]) -> Result<String, ScanError> {
    let rendered = render_bash_json(rules);
    let strategy = splice::resolve_strategy(contents, |c| {
        let outer = scan::find_object_value(c, Span::whole(c), "permission")?;
        scan::find_key_value(c, outer.value, "bash")
    })?;
    Ok(match strategy {
        WriteStrategy::MarkerBlock(block) => {
            splice::splice_marker_block(contents, &block, &inner_lines(&rendered))
        }
        WriteStrategy::StructuralSplice(kv) => splice::splice_value(contents, &kv, &rendered),
    })
}

fn inner_lines(rendered: &str) -> Vec<String> {
    let lines: Vec<&str> = rendered.lines().collect();
    lines[1..lines.len() - 1]
        .iter()
        .map(|line| line.strip_prefix("  ").unwrap_or(line).to_string())
        .collect()
}
