//! permsync - project one permission policy source into every assistant
//! config.
//!
//! Usage:
//!   `permsync` (from anywhere inside the dotfiles repo)
//!
//! Target paths default relative to the repo root, discovered by walking
//! upward until `.chezmoidata/permissions.yaml` is found. Targets that do
//! not exist are skipped with a notice; malformed targets abort the run.

use permsync::generate::{self, Options};
use std::env;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("permsync {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let opts = match parse_options(&args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    };

    if let Err(e) = generate::run(&opts) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--data" | "--claude" | "--codex" | "--opencode") => {
                let Some(value) = args.get(i + 1) else {
                    return Err(format!("{flag} requires a path"));
                };
                let slot = match flag {
                    "--data" => &mut opts.data,
                    "--claude" => &mut opts.claude,
                    "--codex" => &mut opts.codex,
                    _ => &mut opts.opencode,
                };
                *slot = Some(value.clone());
                i += 2;
            }
            "--quiet" | "-q" => {
                opts.quiet = true;
                i += 1;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(opts)
}

fn print_help() {
    eprintln!("permsync - Generate tool permission configs from one policy source");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  permsync [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --data <path>       Permissions YAML source");
    eprintln!("  --claude <path>     Claude settings.json.tmpl target");
    eprintln!("  --codex <path>      Codex default.rules target");
    eprintln!("  --opencode <path>   Opencode opencode.json target");
    eprintln!("  -q, --quiet         Suppress skip notices");
    eprintln!("  -h, --help          Show this help");
    eprintln!("  -V, --version       Show version");
    eprintln!();
    eprintln!("Paths default relative to the repo root (the nearest ancestor");
    eprintln!("directory containing .chezmoidata/permissions.yaml). Explicit");
    eprintln!("paths support a leading ~.");
}
