//! One generation run: resolve paths, load the source document, emit each
//! target in fixed order.
//!
//! Targets are processed sequentially and fail fast. A fatal error leaves
//! already-written targets on disk and untouched targets untouched; there is
//! no cross-file transaction. Missing targets are skipped with a notice.

use std::path::Path;

use crate::claude;
use crate::codex;
use crate::errors::{Error, Result};
use crate::fsio;
use crate::models::Config;
use crate::opencode;
use crate::paths;

/// CLI-level overrides for one run.
#[derive(Debug, Default)]
pub struct Options {
    pub data: Option<String>,
    pub claude: Option<String>,
    pub codex: Option<String>,
    pub opencode: Option<String>,
    /// Suppress skip notices.
    pub quiet: bool,
}

pub fn run(opts: &Options) -> Result<()> {
    // The root walk only happens when some path is defaulted; an invocation
    // overriding every path works outside any repo.
    let needs_root = [&opts.data, &opts.claude, &opts.codex, &opts.opencode]
        .iter()
        .any(|p| p.is_none());
    let root = if needs_root {
        Some(paths::resolve_root()?)
    } else {
        None
    };
    let root = root.as_deref();

    let data_path = paths::resolve_or_default(opts.data.as_deref(), root, paths::DEFAULT_DATA_PATH)?;
    let claude_path =
        paths::resolve_or_default(opts.claude.as_deref(), root, paths::DEFAULT_CLAUDE_PATH)?;
    let codex_path =
        paths::resolve_or_default(opts.codex.as_deref(), root, paths::DEFAULT_CODEX_PATH)?;
    let opencode_path =
        paths::resolve_or_default(opts.opencode.as_deref(), root, paths::DEFAULT_OPENCODE_PATH)?;

    let cfg = load_config(&data_path)?;

    write_claude(&cfg, &claude_path, opts.quiet)?;
    write_codex(&cfg, &codex_path, opts.quiet)?;
    write_opencode(&cfg, &opencode_path, opts.quiet)?;

    Ok(())
}

pub fn load_config(path: &Path) -> Result<Config> {
    let data = fsio::read_to_string(path)?;
    serde_yaml::from_str(&data).map_err(|source| Error::SourceDecode {
        path: path.to_path_buf(),
        source,
    })
}

fn log_skip(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{message}");
    }
}

fn write_claude(cfg: &Config, path: &Path, quiet: bool) -> Result<()> {
    if !paths::file_exists(path) {
        log_skip(quiet, &format!("skipping claude: {} not found", path.display()));
        return Ok(());
    }
    let contents = fsio::read_to_string(path)?;
    let perm = claude::build_permissions(cfg);
    let updated = claude::update_contents(&contents, &perm).map_err(|e| Error::malformed(path, e))?;
    fsio::write_if_changed(path, &updated)?;
    Ok(())
}

fn write_codex(cfg: &Config, path: &Path, quiet: bool) -> Result<()> {
    // The rules file is regenerated wholesale, so only its directory must
    // already exist.
    let dir = path.parent().unwrap_or(Path::new("."));
    if !paths::dir_exists(dir) {
        log_skip(quiet, &format!("skipping codex: {} not found", dir.display()));
        return Ok(());
    }
    let content = codex::render_rules(&codex::build_rules(cfg));
    fsio::write_if_changed(path, &content)?;
    Ok(())
}

fn write_opencode(cfg: &Config, path: &Path, quiet: bool) -> Result<()> {
    if !paths::file_exists(path) {
        log_skip(
            quiet,
            &format!("skipping opencode: {} not found", path.display()),
        );
        return Ok(());
    }
    let contents = fsio::read_to_string(path)?;
    let rules = opencode::build_rules(cfg);
    let updated =
        opencode::update_contents(&contents, &rules).map_err(|e| Error::malformed(path, e))?;
    fsio::write_if_changed(path, &updated)?;
    Ok(())
}
