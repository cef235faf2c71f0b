//! Path resolution for the source document and targets.
//!
//! Default paths live under a root directory discovered by walking upward
//! from the working directory until the default source document is found.
//! Explicit paths are taken as given, after `~` expansion.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

pub const DEFAULT_DATA_PATH: &str = ".chezmoidata/permissions.yaml";
pub const DEFAULT_CLAUDE_PATH: &str = "dot_claude/settings.json.tmpl";
pub const DEFAULT_CODEX_PATH: &str = "dot_codex/rules/default.rules";
pub const DEFAULT_OPENCODE_PATH: &str = "dot_config/opencode/opencode.json";

pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Walk upward from the working directory to the repo root.
pub fn resolve_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::PathResolution(format!("get working directory: {e}")))?;
    find_root(&cwd)
}

/// First ancestor of `start` (inclusive) containing the default source
/// document.
pub fn find_root(start: &Path) -> Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if file_exists(&dir.join(DEFAULT_DATA_PATH)) {
            return Ok(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    Err(Error::PathResolution(format!(
        "could not locate repo root from {}",
        start.display()
    )))
}

/// An explicit path resolved as given, or the default joined onto the root.
pub fn resolve_or_default(path: Option<&str>, root: Option<&Path>, default: &str) -> Result<PathBuf> {
    match path {
        Some(p) if !p.is_empty() => resolve_path(p),
        _ => match root {
            Some(root) => Ok(root.join(default)),
            None => Err(Error::PathResolution(format!(
                "no root directory to resolve {default} against"
            ))),
        },
    }
}

/// Expand a leading `~` and absolutize against the working directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let path = if path.starts_with('~') {
        expand_home(path)?
    } else {
        PathBuf::from(path)
    };
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()
        .map_err(|e| Error::PathResolution(format!("resolve path: {e}")))?;
    Ok(cwd.join(path))
}

/// `~` and `~/...` resolve against the home directory; `~user` is not
/// supported.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::PathResolution("could not resolve home directory".to_string()))?;
    if path == "~" {
        return Ok(home);
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home.join(rest));
    }
    Err(Error::PathResolution(format!(
        "unsupported home path: {path}"
    )))
}
