//! Configuration file handling for rpa-speckit
//!
//! This module contains data structures for:
//! - `speckit.yaml` - Generator policy (framework source, validation, extraction)

pub mod generator;

// Re-export commonly used types
pub use generator::{
    ExtractionPolicy, FrameworkSettings, GeneratorConfig, ValidationPolicy, CONFIG_FILE,
    FRAMEWORK_URL_ENV,
};
