//! Terminal presentation of generation and validation results

pub mod summary;

pub use summary::{format_summary, format_topology, format_validation};
