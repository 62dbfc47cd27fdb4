//! Purpose: `pywhich` CLI entry point: module origin lookup.
//! Role: Resolves each named module independently and prints one line per
//! outcome; any failure makes the process exit code 2.
//! Invariants: Failure lines share stdout with success lines.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::aot::Shell;
use serde_json::json;

use modscope::api::{report, resolve, to_exit_code, ErrorKind, FsLoader};
use modscope::cli_env;

#[derive(Parser)]
#[command(
    name = "pywhich",
    version,
    about = "Report where modules come from and what kind of artifact they are",
    after_help = r#"EXAMPLES
  $ pywhich sys
  $ pywhich --path src mypackage.util othermod

NOTES
  - Built-in modules print as "(built-in)" with no path.
  - Dotted names and package directories are classified by a full load,
    which registers them and their imports for the rest of the process."#
)]
struct Cli {
    #[arg(help = "Module name(s) to resolve")]
    names: Vec<String>,
    #[arg(
        long,
        help = "Search path directory (repeatable; searched before MODSCOPE_PATH entries)",
        value_hint = ValueHint::DirPath
    )]
    path: Vec<PathBuf>,
    #[arg(long, help = "Emit JSON instead of human-readable output")]
    json: bool,
    #[arg(long, value_name = "SHELL", help = "Print a completion script and exit")]
    completions: Option<Shell>,
}

fn main() {
    cli_env::init_tracing();
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::aot::generate(shell, &mut cmd, "pywhich", &mut io::stdout());
        return 0;
    }
    if cli.names.is_empty() {
        Cli::command().print_help().ok();
        return to_exit_code(ErrorKind::Usage);
    }

    let mut loader = FsLoader::new(cli_env::search_paths(&cli.path));
    let mut exit_code = 0;
    let mut entries = Vec::new();

    for name in &cli.names {
        match resolve(&mut loader, name) {
            Ok(record) => {
                if cli.json {
                    entries.push(json!({ "name": name, "resolved": record }));
                } else {
                    println!("{}", report::which_line(&record));
                }
            }
            Err(err) => {
                if cli.json {
                    entries.push(json!({
                        "name": name,
                        "error": {
                            "kind": format!("{:?}", err.kind()),
                            "message": err.message(),
                        },
                    }));
                } else {
                    println!("{}", report::which_failure_line(name, &err));
                }
                // Each failure overwrites the code; with every lookup
                // failure mapping to 2 the distinction is invisible, but
                // the per-name reporting stays independent.
                exit_code = to_exit_code(err.kind());
            }
        }
    }

    if cli.json {
        println!("{}", json!({ "modules": entries }));
    }
    exit_code
}
