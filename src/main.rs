//! Purpose: `moddeps` CLI entry point: import side-effect listing.
//! Role: Binary crate root; parses args, runs the analyzer, prints one line
//! per newly registered module.
//! Invariants: All diagnostic text shares stdout with the report output;
//! only tracing goes to stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueHint};
use clap_complete::aot::Shell;
use serde_json::json;

use modscope::api::{analyze, report, to_exit_code, ErrorKind, FsLoader, Loader, ModuleRecord};
use modscope::cli_env;

#[derive(Parser)]
#[command(
    name = "moddeps",
    version,
    about = "List the modules newly registered by a one-level import",
    after_help = r#"EXAMPLES
  $ moddeps mypackage
  $ moddeps --path src --path vendor mypackage
  $ moddeps                 # base listing of the fresh registry, exit 2

NOTES
  - The import is one-level: dotted names are not decomposed.
  - Search path: --path flags, then MODSCOPE_PATH, else the current directory."#
)]
struct Cli {
    #[arg(help = "Module to import and analyze; omit for the base listing")]
    module: Option<String>,
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
        clap_complete::aot::generate(shell, &mut cmd, "moddeps", &mut io::stdout());
        return 0;
    }

    let mut loader = FsLoader::new(cli_env::search_paths(&cli.path));

    let Some(module) = cli.module else {
        // No argument: the base registry is still printed as a convenience
        // listing, but the invocation counts as a usage failure.
        let snapshot = loader.snapshot();
        emit_records(snapshot.iter(), cli.json);
        return to_exit_code(ErrorKind::Usage);
    };

    match analyze(&mut loader, &module) {
        Ok(diff) => {
            emit_records(diff.iter(), cli.json);
            0
        }
        Err(err) if err.kind() == ErrorKind::Import => {
            println!("No such module.");
            to_exit_code(err.kind())
        }
        Err(err) => {
            println!("{err}");
            to_exit_code(err.kind())
        }
    }
}

fn emit_records<'a>(records: impl Iterator<Item = &'a ModuleRecord>, json: bool) {
    if json {
        let records: Vec<_> = records.collect();
        println!("{}", json!({ "modules": records }));
    } else {
        for record in records {
            println!("{}", report::listing_line(record));
        }
    }
}
