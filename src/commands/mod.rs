//! Command implementations for the rpa-speckit CLI
//!
//! Commands print their own output and return the process exit code; an
//! `Err` is reported by `main`.

pub mod completions;
pub mod generate;
pub mod topology;
pub mod validate;
pub mod version;
