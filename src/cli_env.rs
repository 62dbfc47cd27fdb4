//! Purpose: Shared binary bootstrap: search-path resolution and tracing init.
//! Exports: `SEARCH_PATH_ENV`, `search_paths`, `init_tracing`.
//! Role: Keep `moddeps` and `pywhich` path semantics aligned from one source.
//! Invariants: `--path` flags and `MODSCOPE_PATH` entries are both searched,
//! flags first; the current directory is the fallback when neither is given.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const SEARCH_PATH_ENV: &str = "MODSCOPE_PATH";

/// Search path order: CLI `--path` flags first, then `MODSCOPE_PATH` entries
/// (platform path-list syntax), else `.`.
pub fn search_paths(cli_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = cli_paths.to_vec();
    if let Some(env_value) = std::env::var_os(SEARCH_PATH_ENV) {
        paths.extend(std::env::split_paths(&env_value).filter(|path| !path.as_os_str().is_empty()));
    }
    if paths.is_empty() {
        paths.push(PathBuf::from("."));
    }
    paths
}

/// Stderr tracing controlled by `RUST_LOG`; silent by default so the stdout
/// report formats stay clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
