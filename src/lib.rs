//! Permsync - single-source tool permission policy for AI coding assistants.
//!
//! One declarative YAML document drives the permission configuration of
//! three consumers, each with its own syntax and evaluation semantics:
//!
//! - Claude Code: a `permissions` object spliced into `settings.json.tmpl`
//! - Codex: a `prefix_rule(...)` definition file, regenerated wholesale
//! - Opencode: a glob-pattern map spliced into `permission.bash`
//!
//! Claude and Opencode targets are chezmoi-style files mixing JSON with
//! template syntax, so they are never parsed and re-serialized; generated
//! regions are spliced in place (marker pair, or located key value) and
//! every surrounding byte is preserved.
//!
//! # Example
//!
//! ```
//! use permsync::claude::merge_with_shared;
//!
//! // Shared bash prefixes expand into Bash(cmd:*) tokens at the sentinel.
//! let merged = merge_with_shared(
//!     &["WebSearch".to_string(), "__BASH__".to_string()],
//!     &["git".to_string()],
//! );
//! assert_eq!(merged, vec!["WebSearch", "Bash(git:*)"]);
//! ```

pub mod claude;
pub mod codex;
pub mod errors;
pub mod fsio;
pub mod generate;
pub mod lists;
pub mod models;
pub mod opencode;
pub mod paths;
pub mod scan;
pub mod splice;

pub use errors::{Error, Result};
pub use generate::{Options, run};
pub use models::{Config, Decision};
