//! Core types for the permission policy source document.
//!
//! The YAML schema mirrors the three downstream consumers: a shared `bash`
//! group of bare command prefixes, the `claude` permission lists, and the
//! `opencode` glob pattern lists. Missing keys decode as empty groups.

use serde::Deserialize;

/// Placeholder token inside a `claude` list marking where the expanded
/// shared bash patterns are spliced.
pub const BASH_SENTINEL: &str = "__BASH__";

/// Permission decision vocabulary shared by all three targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Ask,
    Deny,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "ask",
            Self::Deny => "deny",
        }
    }

    /// Name used by the codex rule renderer.
    pub fn codex_name(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Ask => "prompt",
            Self::Deny => "forbidden",
        }
    }
}

/// Root of the permissions YAML document.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bash: BashConfig,
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub opencode: OpencodeConfig,
}

/// Shared command prefixes, expanded per target.
#[derive(Debug, Deserialize, Default)]
pub struct BashConfig {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub ask: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

impl BashConfig {
    pub fn list(&self, decision: Decision) -> &[String] {
        match decision {
            Decision::Allow => &self.allow,
            Decision::Ask => &self.ask,
            Decision::Deny => &self.deny,
        }
    }
}

/// Claude-specific permission strings; may embed [`BASH_SENTINEL`].
#[derive(Debug, Deserialize, Default)]
pub struct ClaudeConfig {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub ask: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
    #[serde(default, rename = "additionalDirectories")]
    pub additional_directories: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OpencodeConfig {
    #[serde(default)]
    pub bash: OpencodeBashConfig,
}

/// Opencode bash permission map: a default decision plus glob pattern lists.
#[derive(Debug, Deserialize, Default)]
pub struct OpencodeBashConfig {
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub ask: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

impl OpencodeBashConfig {
    pub fn list(&self, decision: Decision) -> &[String] {
        match decision {
            Decision::Allow => &self.allow,
            Decision::Ask => &self.ask,
            Decision::Deny => &self.deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_document() {
        let yaml = r#"
bash:
  allow:
    - git status
    - ls
  deny:
    - rm
claude:
  allow:
    - __BASH__
    - WebSearch
  additionalDirectories:
    - ~/notes
opencode:
  bash:
    default: ask
    deny:
      - "rm *"
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.bash.allow, vec!["git status", "ls"]);
        assert_eq!(cfg.bash.deny, vec!["rm"]);
        assert!(cfg.bash.ask.is_empty());
        assert_eq!(cfg.claude.allow, vec![BASH_SENTINEL, "WebSearch"]);
        assert_eq!(cfg.claude.additional_directories, vec!["~/notes"]);
        assert_eq!(cfg.opencode.bash.default, "ask");
        assert_eq!(cfg.opencode.bash.deny, vec!["rm *"]);
    }

    #[test]
    fn test_decode_missing_keys_default_empty() {
        let cfg: Config = serde_yaml::from_str("bash:\n  allow: [git]\n").unwrap();
        assert_eq!(cfg.bash.allow, vec!["git"]);
        assert!(cfg.claude.allow.is_empty());
        assert!(cfg.opencode.bash.default.is_empty());
    }

    #[test]
    fn test_codex_decision_names() {
        assert_eq!(Decision::Allow.codex_name(), "allow");
        assert_eq!(Decision::Ask.codex_name(), "prompt");
        assert_eq!(Decision::Deny.codex_name(), "forbidden");
    }
}
