//! Purpose: Define the stable public Rust API boundary for modscope.
//! Exports: Core types and operations needed by the binaries and tests.
//! Role: Public, additive-only surface; rendering and resolution details
//! stay behind it.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::loader::{FsLoader, Loader};
pub use crate::core::name::ModuleName;
pub use crate::core::record::{DiffResult, ModuleKind, ModuleRecord, ModuleSet};
pub use crate::core::{analyze::analyze, locate::resolve, report};
