//! Purpose: Explicit module registry and filesystem loader.
//! Exports: `Loader`, `FsLoader`.
//! Role: Owns the in-memory registry map the analyzer and locator work
//! against; replaces the ambient interpreter module table of the original
//! tooling with an injectable seam.
//! Invariants: Modules register before their imports are scanned (cycles
//! terminate). Loads of already-registered names are no-ops.
//! Invariants: A failed load leaves a tombstone slot; snapshots exclude it
//! and repeat loads of that name fail fast.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::name::ModuleName;
use crate::core::record::{ModuleKind, ModuleRecord, ModuleSet};

/// Registry operations the analyzer and locator depend on. `FsLoader` is the
/// real implementation; tests inject fakes.
pub trait Loader {
    /// Point-in-time copy of the registry. Never triggers a load.
    fn snapshot(&self) -> ModuleSet;

    /// Non-executing search for `name` as one path segment. Classifies
    /// concrete artifacts only (source/compiled/extension/builtin/frozen);
    /// package directories require a full load. Registers nothing.
    fn find_segment(&self, name: &str) -> Result<ModuleRecord, Error>;

    /// One-level load of `name` as a single segment. Dotted names are not
    /// decomposed, mirroring a one-level import.
    fn load_segment(&mut self, name: &str) -> Result<ModuleRecord, Error>;

    /// Full dotted load: every prefix of `name` is loaded left to right,
    /// each segment resolved inside its parent package directory.
    fn load(&mut self, name: &str) -> Result<ModuleRecord, Error>;
}

// Module names satisfied by the host runtime itself rather than an on-disk
// artifact. Mirrors a bare CPython interpreter's bootstrap table.
const DEFAULT_BUILTINS: &[&str] = &[
    "_abc",
    "_codecs",
    "_collections",
    "_functools",
    "_imp",
    "_io",
    "_operator",
    "_signal",
    "_sre",
    "_stat",
    "_string",
    "_symtable",
    "_thread",
    "_warnings",
    "_weakref",
    "atexit",
    "builtins",
    "errno",
    "faulthandler",
    "gc",
    "itertools",
    "marshal",
    "posix",
    "sys",
    "time",
];

const DEFAULT_FROZEN: &[&str] = &["_frozen_importlib", "_frozen_importlib_external", "zipimport"];

const FILE_SUFFIXES: &[(&str, ModuleKind)] = &[
    ("py", ModuleKind::Source),
    ("pyc", ModuleKind::Compiled),
    ("so", ModuleKind::Extension),
    ("pyd", ModuleKind::Extension),
];

#[derive(Clone, Debug)]
enum Slot {
    Loaded(ModuleRecord),
    Failed,
}

pub struct FsLoader {
    search_paths: Vec<PathBuf>,
    registry: BTreeMap<String, Slot>,
    builtins: BTreeSet<&'static str>,
    frozen: BTreeSet<&'static str>,
}

impl FsLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let builtins: BTreeSet<&'static str> = DEFAULT_BUILTINS.iter().copied().collect();
        let frozen: BTreeSet<&'static str> = DEFAULT_FROZEN.iter().copied().collect();
        let mut registry = BTreeMap::new();
        for name in &builtins {
            registry.insert((*name).to_string(), Slot::Loaded(ModuleRecord::builtin(*name)));
        }
        for name in &frozen {
            registry.insert((*name).to_string(), Slot::Loaded(ModuleRecord::frozen(*name)));
        }
        Self {
            search_paths,
            registry,
            builtins,
            frozen,
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn register(&mut self, record: ModuleRecord) {
        self.registry.insert(record.name.clone(), Slot::Loaded(record));
    }

    fn load_name(&mut self, name: &ModuleName) -> Result<ModuleRecord, Error> {
        if let Some(parent) = name.parent() {
            self.load_name(&parent)?;
        }
        self.load_one(name)
    }

    fn load_one(&mut self, name: &ModuleName) -> Result<ModuleRecord, Error> {
        let key = name.as_dotted();
        match self.registry.get(&key) {
            Some(Slot::Loaded(record)) => return Ok(record.clone()),
            Some(Slot::Failed) => {
                return Err(Error::new(ErrorKind::NotFound)
                    .with_message(format!("module '{key}' previously failed to load"))
                    .with_module(key));
            }
            None => {}
        }
        let outcome = self.resolve_and_register(name);
        if outcome.is_err() {
            self.registry.insert(key, Slot::Failed);
        }
        outcome
    }

    fn resolve_and_register(&mut self, name: &ModuleName) -> Result<ModuleRecord, Error> {
        let key = name.as_dotted();
        let segment = name.tail().to_string();

        let candidate_dirs: Vec<PathBuf> = match name.parent() {
            None => self.search_paths.clone(),
            Some(parent) => {
                let parent_record = match self.registry.get(&parent.as_dotted()) {
                    Some(Slot::Loaded(record)) => record.clone(),
                    _ => return Err(not_found(&key)),
                };
                if parent_record.kind != ModuleKind::Package {
                    return Err(Error::new(ErrorKind::NotFound)
                        .with_message(format!("'{}' is not a package", parent.as_dotted()))
                        .with_module(key));
                }
                parent_record.origin.into_iter().collect()
            }
        };

        for dir in &candidate_dirs {
            let package_dir = dir.join(&segment);
            if package_dir.is_dir() {
                let record =
                    ModuleRecord::file(key.clone(), package_dir.clone(), ModuleKind::Package);
                self.register(record.clone());
                let init = package_dir.join("__init__.py");
                if init.is_file() {
                    self.scan_and_load_imports(name, &init)?;
                }
                debug!(module = %key, dir = %package_dir.display(), "loaded package");
                return Ok(record);
            }
            if let Some((path, kind)) = probe_file_artifact(dir, &segment) {
                let record = ModuleRecord::file(key.clone(), path.clone(), kind);
                self.register(record.clone());
                if kind == ModuleKind::Source {
                    self.scan_and_load_imports(name, &path)?;
                }
                debug!(module = %key, path = %path.display(), kind = kind.as_str(), "loaded module");
                return Ok(record);
            }
        }
        Err(not_found(&key))
    }

    /// Reads a source file and best-effort loads the modules its import
    /// statements reference. Only the read itself can fail: a static scan
    /// cannot tell guarded imports from required ones, so unresolvable
    /// targets are skipped with a trace.
    fn scan_and_load_imports(&mut self, importer: &ModuleName, path: &Path) -> Result<(), Error> {
        let text = fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read module source")
                .with_module(importer.as_dotted())
                .with_path(path)
                .with_source(err)
        })?;

        // A package's __init__ is its own relative-import base; a plain
        // module resolves relative imports against its containing package.
        let package = if path.file_name().and_then(|f| f.to_str()) == Some("__init__.py") {
            Some(importer.clone())
        } else {
            importer.parent()
        };

        for target in scan_imports(&text) {
            match resolve_import_target(&target, &package) {
                Ok(resolved) => self.load_dependency(&resolved, &target.names),
                Err(reason) => {
                    debug!(importer = %importer, reason, "skipped relative import");
                }
            }
        }
        Ok(())
    }

    fn load_dependency(&mut self, name: &ModuleName, names: &[String]) {
        if let Err(err) = self.load_name(name) {
            debug!(module = %name, error = %err, "skipped unresolved import");
            return;
        }
        // `from pkg import x`: x may be a submodule rather than an
        // attribute; load it only when a matching artifact exists.
        for sub in names {
            let child = name.child(sub);
            if self.registry.contains_key(&child.as_dotted()) {
                continue;
            }
            if self.submodule_exists(name, sub) {
                if let Err(err) = self.load_name(&child) {
                    debug!(module = %child, error = %err, "skipped unresolved import");
                }
            }
        }
    }

    fn submodule_exists(&self, parent: &ModuleName, segment: &str) -> bool {
        match self.registry.get(&parent.as_dotted()) {
            Some(Slot::Loaded(record)) if record.kind == ModuleKind::Package => {
                match record.origin_path() {
                    Some(dir) => {
                        dir.join(segment).is_dir() || probe_file_artifact(dir, segment).is_some()
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

impl Loader for FsLoader {
    fn snapshot(&self) -> ModuleSet {
        self.registry
            .values()
            .filter_map(|slot| match slot {
                Slot::Loaded(record) => Some(record.clone()),
                Slot::Failed => None,
            })
            .collect()
    }

    fn find_segment(&self, name: &str) -> Result<ModuleRecord, Error> {
        if self.builtins.contains(name) {
            return Ok(ModuleRecord::builtin(name));
        }
        if self.frozen.contains(name) {
            return Ok(ModuleRecord::frozen(name));
        }
        for dir in &self.search_paths {
            let package_dir = dir.join(name);
            if package_dir.is_dir() {
                return Err(Error::new(ErrorKind::NotFound)
                    .with_message(format!(
                        "'{name}' is a directory; classification requires a full load"
                    ))
                    .with_module(name)
                    .with_path(package_dir));
            }
            if let Some((path, kind)) = probe_file_artifact(dir, name) {
                return Ok(ModuleRecord::file(name, path, kind));
            }
        }
        Err(not_found(name))
    }

    fn load_segment(&mut self, name: &str) -> Result<ModuleRecord, Error> {
        if name.is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("empty module name"));
        }
        // The whole string is one segment here: `a.b` is looked up as-is
        // and ordinarily fails, like a one-level import would.
        self.load_one(&ModuleName::from_segments(&[name]))
    }

    fn load(&mut self, name: &str) -> Result<ModuleRecord, Error> {
        let name = ModuleName::from_dotted(name)?;
        self.load_name(&name)
    }
}

fn probe_file_artifact(dir: &Path, stem: &str) -> Option<(PathBuf, ModuleKind)> {
    for (suffix, kind) in FILE_SUFFIXES {
        let path = dir.join(format!("{stem}.{suffix}"));
        if path.is_file() {
            return Some((path, *kind));
        }
    }
    None
}

fn not_found(name: &str) -> Error {
    Error::new(ErrorKind::NotFound)
        .with_message(format!("no module named '{name}' on the search path"))
        .with_module(name)
}

/// One import statement found while scanning a source file.
#[derive(Debug, Eq, PartialEq)]
struct ImportTarget {
    /// Leading dots on a `from` import; 0 for absolute imports.
    level: usize,
    /// Dotted path after the dots; empty for `from . import x`.
    path: Vec<String>,
    /// Names after `import` in a `from` import; empty for plain imports.
    names: Vec<String>,
}

fn scan_imports(text: &str) -> Vec<ImportTarget> {
    let mut targets = Vec::new();
    let mut lines = text.lines();
    while let Some(raw) = lines.next() {
        let line = raw.trim();
        if !line.starts_with("import ") && !line.starts_with("from ") {
            continue;
        }
        // Parenthesized name lists and backslash continuations span
        // physical lines; join them into one statement before parsing.
        let mut statement = line.to_string();
        while needs_continuation(&statement) {
            if statement.ends_with('\\') {
                statement.pop();
            }
            let Some(next) = lines.next() else {
                break;
            };
            statement.push(' ');
            statement.push_str(next.trim());
        }
        parse_import_statement(&statement, &mut targets);
    }
    targets
}

fn needs_continuation(statement: &str) -> bool {
    statement.ends_with('\\')
        || statement.matches('(').count() > statement.matches(')').count()
}

fn parse_import_statement(statement: &str, targets: &mut Vec<ImportTarget>) {
    if let Some(rest) = statement.strip_prefix("import ") {
        for clause in rest.split(',') {
            let token = clause.split_whitespace().next().unwrap_or_default();
            if let Some(path) = dotted_segments(token) {
                targets.push(ImportTarget {
                    level: 0,
                    path,
                    names: Vec::new(),
                });
            }
        }
    } else if let Some(rest) = statement.strip_prefix("from ") {
        let mut parts = rest.splitn(2, " import ");
        let module_part = parts.next().unwrap_or_default().trim();
        let Some(names_part) = parts.next() else {
            return;
        };
        let level = module_part.chars().take_while(|c| *c == '.').count();
        let path_part = &module_part[level..];
        let path = if path_part.is_empty() {
            Vec::new()
        } else {
            match dotted_segments(path_part) {
                Some(path) => path,
                None => return,
            }
        };
        if level == 0 && path.is_empty() {
            return;
        }
        let names = names_part
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .filter_map(|clause| clause.split_whitespace().next())
            .filter(|token| is_identifier(token))
            .map(str::to_string)
            .collect();
        targets.push(ImportTarget { level, path, names });
    }
}

fn resolve_import_target(
    target: &ImportTarget,
    package: &Option<ModuleName>,
) -> Result<ModuleName, &'static str> {
    if target.level == 0 {
        return Ok(ModuleName::from_segments(&target.path));
    }
    let Some(package) = package else {
        return Err("relative import outside a package");
    };
    let base = package
        .strip_last(target.level - 1)
        .ok_or("relative import beyond top-level package")?;
    if target.path.is_empty() {
        Ok(base)
    } else {
        Ok(base.join(&target.path))
    }
}

fn dotted_segments(token: &str) -> Option<Vec<String>> {
    if token.is_empty() {
        return None;
    }
    let segments: Vec<String> = token.split('.').map(str::to_string).collect();
    if segments.iter().all(|segment| is_identifier(segment)) {
        Some(segments)
    } else {
        None
    }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
