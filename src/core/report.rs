//! Purpose: Text rendering for listings, diffs, and locator outcomes.
//! Exports: `listing_line`, `which_line`, `which_failure_line`, `origin_label`.
//! Role: Pure text production from already-computed records; no I/O here.
//! Invariants: Output line shapes are stable; scripts parse them.

use crate::core::error::Error;
use crate::core::record::{ModuleKind, ModuleRecord};

/// Width of the right-aligned name column in listing output.
pub const NAME_COLUMN_WIDTH: usize = 35;

/// Origin column for listing output: `(built-in)`, `<dir> (package)`, or
/// `<path> (<kind>)`.
pub fn origin_label(record: &ModuleRecord) -> String {
    match (record.kind, record.origin_path()) {
        (ModuleKind::Builtin, _) => "(built-in)".to_string(),
        (ModuleKind::Frozen, _) => "(frozen)".to_string(),
        (ModuleKind::Package, Some(dir)) => format!("{} (package)", dir.display()),
        (kind, Some(path)) => format!("{} ({})", path.display(), kind.as_str()),
        (_, None) => "(unknown)".to_string(),
    }
}

pub fn listing_line(record: &ModuleRecord) -> String {
    format!(
        "{:>width$} -> {}",
        record.name,
        origin_label(record),
        width = NAME_COLUMN_WIDTH
    )
}

pub fn which_line(record: &ModuleRecord) -> String {
    format!("{} => {}.", record.name, origin_label(record))
}

pub fn which_failure_line(name: &str, err: &Error) -> String {
    format!(
        "{} => {:?}: {}!",
        name,
        err.kind(),
        err.message().unwrap_or("unresolved module")
    )
}
