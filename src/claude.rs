//! Claude settings permission block generation.
//!
//! Expands the shared bash prefixes into `Bash(cmd:*)` permission tokens,
//! merges them into the claude-specific lists at the `__BASH__` sentinel, and
//! splices the resulting permission object into `settings.json.tmpl`:
//! between the marker pair when present, else over the value of the
//! `permissions` key.

use serde::Serialize;

use crate::errors::ScanError;
use crate::lists::{OrderedSet, normalize_list};
use crate::models::{BASH_SENTINEL, Config};
use crate::scan::{self, Span};
use crate::splice::{self, WriteStrategy};

/// The generated `permissions` object. Field order is the emitted key order.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClaudePermissions {
    pub allow: Vec<String>,
    pub ask: Vec<String>,
    pub deny: Vec<String>,
    #[serde(rename = "additionalDirectories")]
    pub additional_directories: Vec<String>,
}

/// Wrap each normalized command prefix as a `Bash(cmd:*)` permission token.
pub fn to_bash_patterns(values: &[String]) -> Vec<String> {
    normalize_list(values)
        .iter()
        .map(|v| format!("Bash({v}:*)"))
        .collect()
}

/// Merge a claude list with the expanded shared patterns.
///
/// Each sentinel occurrence re-emits the full expanded sequence; one running
/// first-seen set suppresses duplicates across occurrences, so re-merging
/// already-merged output is a no-op. With an empty shared list the sentinel
/// vanishes; with no sentinel the expanded patterns are appended at the end.
pub fn merge_with_shared(values: &[String], bash_values: &[String]) -> Vec<String> {
    let normalized = normalize_list(values);
    let bash_patterns = to_bash_patterns(bash_values);

    let mut out = OrderedSet::new();
    let mut saw_sentinel = false;
    for item in &normalized {
        if item == BASH_SENTINEL {
            saw_sentinel = true;
            out.extend(bash_patterns.iter().map(String::as_str));
            continue;
        }
        out.insert(item);
    }
    if !saw_sentinel {
        out.extend(bash_patterns.iter().map(String::as_str));
    }
    out.into_vec()
}

pub fn build_permissions(cfg: &Config) -> ClaudePermissions {
    ClaudePermissions {
        allow: merge_with_shared(&cfg.claude.allow, &cfg.bash.allow),
        ask: merge_with_shared(&cfg.claude.ask, &cfg.bash.ask),
        deny: merge_with_shared(&cfg.claude.deny, &cfg.bash.deny),
        additional_directories: normalize_list(&cfg.claude.additional_directories),
    }
}

/// Splice the permission object into `contents`.
pub fn update_contents(contents: &str, perm: &ClaudePermissions) -> Result<String, ScanError> {
    let strategy = splice::resolve_strategy(contents, |c| {
        scan::find_key_value(c, Span::whole(c), "permissions")
    })?;
    Ok(match strategy {
        WriteStrategy::MarkerBlock(block) => {
            splice::splice_marker_block(contents, &block, &block_lines(perm))
        }
        WriteStrategy::StructuralSplice(kv) => {
            splice::splice_value(contents, &kv, &render_object(perm))
        }
    })
}

fn render_object(perm: &ClaudePermissions) -> String {
    serde_json::to_string_pretty(perm).expect("permissions serialize")
}

/// The object's inner lines with one indent level stripped, ready for the
/// marker block (which re-applies the captured indent).
fn block_lines(perm: &ClaudePermissions) -> Vec<String> {
    let json = render_object(perm);
    let lines: Vec<&str> = json.lines().collect();
    lines[1..lines.len() - 1]
        .iter()
        .map(|line| line.strip_prefix("  ").unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BashConfig, ClaudeConfig};
    use crate::splice::{END_MARKER, START_MARKER};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_bash_patterns() {
        assert_eq!(
            to_bash_patterns(&strings(&[" foo ", "", "bar"])),
            vec!["Bash(foo:*)", "Bash(bar:*)"]
        );
    }

    #[test]
    fn test_merge_no_bash_values() {
        assert_eq!(merge_with_shared(&strings(&[" a "]), &[]), vec!["a"]);
        assert!(merge_with_shared(&[], &[]).is_empty());
    }

    #[test]
    fn test_merge_no_sentinel_appends() {
        assert_eq!(
            merge_with_shared(&strings(&["git status", "ls"]), &strings(&["git"])),
            vec!["git status", "ls", "Bash(git:*)"]
        );
    }

    #[test]
    fn test_merge_sentinel_splices_in_place() {
        let values = strings(&["alpha", BASH_SENTINEL, "beta", BASH_SENTINEL, "alpha"]);
        assert_eq!(
            merge_with_shared(&values, &strings(&["git", "ls"])),
            vec!["alpha", "Bash(git:*)", "Bash(ls:*)", "beta"]
        );
    }

    #[test]
    fn test_merge_sentinel_vanishes_when_shared_empty() {
        assert_eq!(
            merge_with_shared(&strings(&["x", BASH_SENTINEL, "y"]), &[]),
            vec!["x", "y"]
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let merged = merge_with_shared(&strings(&["x", BASH_SENTINEL]), &strings(&["git"]));
        assert_eq!(merge_with_shared(&merged, &strings(&["git"])), merged);
    }

    #[test]
    fn test_build_permissions() {
        let cfg = Config {
            bash: BashConfig {
                allow: strings(&["git"]),
                ask: strings(&["cp"]),
                deny: strings(&["rm"]),
            },
            claude: ClaudeConfig {
                allow: strings(&["foo", BASH_SENTINEL]),
                ask: vec![],
                deny: strings(&["   "]),
                additional_directories: strings(&[" /tmp ", "", " /var "]),
            },
            ..Default::default()
        };

        let got = build_permissions(&cfg);
        assert_eq!(got.allow, vec!["foo", "Bash(git:*)"]);
        assert_eq!(got.ask, vec!["Bash(cp:*)"]);
        assert_eq!(got.deny, vec!["Bash(rm:*)"]);
        assert_eq!(got.additional_directories, vec!["/tmp", "/var"]);
    }

    fn one_allow() -> ClaudePermissions {
        ClaudePermissions {
            allow: strings(&["a"]),
            ask: vec![],
            deny: vec![],
            additional_directories: vec![],
        }
    }

    #[test]
    fn test_block_lines() {
        assert_eq!(
            block_lines(&one_allow()),
            vec![
                "\"allow\": [",
                "  \"a\"",
                "],",
                "\"ask\": [],",
                "\"deny\": [],",
                "\"additionalDirectories\": []",
            ]
        );
    }

    #[test]
    fn test_update_contents_via_markers() {
        let input = format!("before\n  {START_MARKER}\n  \"old\": true\n  {END_MARKER}\nafter\n");
        let got = update_contents(&input, &one_allow()).unwrap();
        let want = format!(
            "before\n  {START_MARKER}\n  \"allow\": [\n    \"a\"\n  ],\n  \"ask\": [],\n  \"deny\": [],\n  \"additionalDirectories\": []\n  {END_MARKER}\nafter\n"
        );
        assert_eq!(got, want);
    }

    #[test]
    fn test_update_contents_structural_fallback() {
        let input = "{\n  \"model\": \"opus\",\n  \"permissions\": {\n    \"allow\": []\n  }\n}\n";
        let got = update_contents(input, &one_allow()).unwrap();
        let want = "{\n  \"model\": \"opus\",\n  \"permissions\": {\n    \"allow\": [\n      \"a\"\n    ],\n    \"ask\": [],\n    \"deny\": [],\n    \"additionalDirectories\": []\n  }\n}\n";
        assert_eq!(got, want);
        // A second pass over the updated file changes nothing.
        assert_eq!(update_contents(&got, &one_allow()).unwrap(), got);
    }

    #[test]
    fn test_update_contents_no_anchor_is_error() {
        let err = update_contents("no markers here", &one_allow()).unwrap_err();
        assert_eq!(err, ScanError::KeyNotFound("permissions".to_string()));
    }
}
