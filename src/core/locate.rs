//! Purpose: Resolve one module name to its origin and classification.
//! Exports: `resolve`.
//! Invariants: The cheap non-executing search runs first; the full-load
//! fallback is the only path that mutates the registry.

use tracing::debug;

use crate::core::error::Error;
use crate::core::loader::Loader;
use crate::core::record::ModuleRecord;

/// Resolves `name` to a record. A concrete single-segment artifact wins
/// immediately without loading; dotted submodules, package directories, and
/// namespace packages fall back to a full load, which permanently registers
/// `name` and its transitive imports. Both steps failing yields the
/// fallback's error.
pub fn resolve<L: Loader + ?Sized>(loader: &mut L, name: &str) -> Result<ModuleRecord, Error> {
    match loader.find_segment(name) {
        Ok(record) => Ok(record),
        Err(err) => {
            debug!(module = name, error = %err, "cheap search failed; loading");
            loader.load(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::core::loader::{FsLoader, Loader};
    use crate::core::record::ModuleKind;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn builtin_resolves_with_no_origin() {
        let temp = tempfile::tempdir().unwrap();
        let mut loader = FsLoader::new(vec![temp.path().to_path_buf()]);

        let record = resolve(&mut loader, "sys").unwrap();
        assert_eq!(record.kind, ModuleKind::Builtin);
        assert_eq!(record.origin, None);
    }

    #[test]
    fn source_file_resolves_without_loading() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "alpha.py", "import beta\n");
        write(temp.path(), "beta.py", "");

        let mut loader = FsLoader::new(vec![temp.path().to_path_buf()]);
        let before = loader.snapshot();

        let record = resolve(&mut loader, "alpha").unwrap();
        assert_eq!(record.kind, ModuleKind::Source);
        assert_eq!(record.origin, Some(temp.path().join("alpha.py")));
        // cheap path: nothing registered, beta untouched
        assert_eq!(loader.snapshot(), before);
    }

    #[test]
    fn package_directory_resolves_via_fallback_load() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "pkg/__init__.py", "");

        let mut loader = FsLoader::new(vec![temp.path().to_path_buf()]);
        let record = resolve(&mut loader, "pkg").unwrap();
        assert_eq!(record.kind, ModuleKind::Package);
        assert_eq!(record.origin, Some(temp.path().join("pkg")));
        // fallback loads, so the registry now remembers pkg
        assert!(loader.snapshot().contains("pkg"));
    }

    #[test]
    fn dotted_submodule_resolves_via_fallback_load() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "pkg/__init__.py", "");
        write(temp.path(), "pkg/mod.py", "");

        let mut loader = FsLoader::new(vec![temp.path().to_path_buf()]);
        let record = resolve(&mut loader, "pkg.mod").unwrap();
        assert_eq!(record.kind, ModuleKind::Source);
        assert_eq!(record.origin, Some(temp.path().join("pkg").join("mod.py")));
    }

    #[test]
    fn nonexistent_name_fails_with_the_fallback_error() {
        let temp = tempfile::tempdir().unwrap();
        let mut loader = FsLoader::new(vec![temp.path().to_path_buf()]);

        let err = resolve(&mut loader, "doesnotexist_xyz").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.message().unwrap().contains("doesnotexist_xyz"));
    }
}
