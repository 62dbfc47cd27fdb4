//! Purpose: Import side-effect analysis: snapshot, load, snapshot, diff.
//! Exports: `analyze`.
//! Invariants: The load is one-level; dotted sub-paths are not attempted.
//! Invariants: Repeat analysis of a name yields an empty diff because the
//! registry remembers prior loads; this is load semantics, not a defect.

use crate::core::error::{Error, ErrorKind};
use crate::core::loader::Loader;
use crate::core::record::DiffResult;

/// Loads `name` through `loader` and reports every module newly registered
/// as a side effect, the loaded module itself included.
pub fn analyze<L: Loader + ?Sized>(loader: &mut L, name: &str) -> Result<DiffResult, Error> {
    let before = loader.snapshot();
    loader.load_segment(name).map_err(|err| {
        Error::new(ErrorKind::Import)
            .with_message(format!("module '{name}' could not be loaded"))
            .with_module(name)
            .with_source(err)
    })?;
    let after = loader.snapshot();
    Ok(after.diff(&before))
}
