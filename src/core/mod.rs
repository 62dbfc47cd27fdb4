// Core modules implementing the registry, resolution, and error modeling.
pub mod analyze;
pub mod error;
pub mod loader;
pub mod locate;
pub mod name;
pub mod record;
pub mod report;
