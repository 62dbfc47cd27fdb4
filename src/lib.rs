//! Purpose: Shared core library crate used by the `moddeps` and `pywhich`
//! binaries and tests.
//! Exports: `core` (registry, resolution, analysis, reporting, errors),
//! `api` (public boundary), `cli_env` (binary bootstrap helpers).
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.

pub mod api;
pub mod cli_env;
pub mod core;
