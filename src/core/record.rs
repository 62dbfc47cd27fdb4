//! Purpose: Immutable module records, registry snapshots, and snapshot diffs.
//! Exports: `ModuleKind`, `ModuleRecord`, `ModuleSet`, `DiffResult`.
//! Invariants: Records never change after construction.
//! Invariants: Snapshots compare by name set only; record contents beyond the
//! name play no part in diffing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Classification of where a module comes from. Replaces attribute probing
/// with an explicit tag produced by the loader/locator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Source,
    Compiled,
    Extension,
    Package,
    Builtin,
    Frozen,
    Unknown,
}

impl ModuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Source => "source",
            ModuleKind::Compiled => "compiled",
            ModuleKind::Extension => "extension",
            ModuleKind::Package => "package",
            ModuleKind::Builtin => "builtin",
            ModuleKind::Frozen => "frozen",
            ModuleKind::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ModuleRecord {
    pub name: String,
    /// File or directory the module came from. Absent for builtin/frozen
    /// entries, which have no on-disk artifact.
    pub origin: Option<PathBuf>,
    pub kind: ModuleKind,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>, origin: Option<PathBuf>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            origin,
            kind,
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self::new(name, None, ModuleKind::Builtin)
    }

    pub fn frozen(name: impl Into<String>) -> Self {
        Self::new(name, None, ModuleKind::Frozen)
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, kind: ModuleKind) -> Self {
        Self::new(name, Some(path.into()), kind)
    }

    pub fn origin_path(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// Point-in-time copy of the registry, keyed by dotted name. A map keyed by
/// name de-duplicates repeated registrations of one name while keeping the
/// same artifact registered under several names as distinct entries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModuleSet {
    records: BTreeMap<String, ModuleRecord>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ModuleRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.values()
    }

    /// Records present here but absent by name from `before`.
    pub fn diff(&self, before: &ModuleSet) -> DiffResult {
        let records = self
            .records
            .values()
            .filter(|record| !before.contains(&record.name))
            .cloned()
            .collect();
        DiffResult { records }
    }
}

impl FromIterator<ModuleRecord> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = ModuleRecord>>(iter: I) -> Self {
        let mut set = ModuleSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Names newly registered across one load. Enumeration order carries no
/// meaning; callers that need determinism get it from the underlying map
/// order, not from any contract here.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiffResult {
    records: Vec<ModuleRecord>,
}

impl DiffResult {
    pub fn contains(&self, name: &str) -> bool {
        self.records.iter().any(|record| record.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.records.iter()
    }
}
