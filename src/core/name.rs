//! Purpose: Validated dotted module names and structural operations on them.
//! Exports: `ModuleName`.
//! Role: Shared currency between the loader's dotted resolution and the
//! relative-import rewriting done while scanning source files.
//! Invariants: Segments are non-empty; a `ModuleName` is always absolute.

use std::fmt;

use crate::core::error::{Error, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    /// Parses a dotted name such as `pkg.sub.mod`. Empty names and empty
    /// segments (`a..b`, leading or trailing dots) are usage errors.
    pub fn from_dotted(name: &str) -> Result<Self, Error> {
        if name.is_empty() || name.split('.').any(|segment| segment.is_empty()) {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("invalid module name '{name}'")));
        }
        Ok(Self(name.split('.').map(str::to_string).collect()))
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        assert!(!segments.is_empty());
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn as_dotted(&self) -> String {
        self.0.join(".")
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn tail(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<ModuleName> {
        self.strip_last(1)
    }

    /// Removes `n` segments from the end, or `None` if that would erase the
    /// name entirely. This is the structural half of relative-import
    /// resolution; dot-counting semantics live in the loader.
    pub fn strip_last(&self, n: usize) -> Option<ModuleName> {
        if n >= self.0.len() {
            return None;
        }
        Some(ModuleName(self.0[..self.0.len() - n].to_vec()))
    }

    pub fn join<I>(&self, tail: I) -> ModuleName
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut segments = self.0.clone();
        for segment in tail {
            segments.push(segment.as_ref().to_string());
        }
        ModuleName(segments)
    }

    pub fn child(&self, segment: &str) -> ModuleName {
        self.join([segment])
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_dotted())
    }
}
