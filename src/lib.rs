//! rpa-speckit - generate T2C RPA projects from markdown specifications
//!
//! A spec directory (`spec.md`, `selectors.md`, `business-rules.md`,
//! `tests.md`, `tasks.md`) is loaded and validated, the T2C base framework is
//! acquired through a tiered fallback, and a customized BotCity project is
//! rendered for every automation unit.
//!
//! The pipeline entry point is [`generate::generate`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod framework;
pub mod generate;
pub mod git;
pub mod logging;
pub mod progress;
pub mod render;
pub mod scaffold;
pub mod specs;
pub mod ui;

pub use error::{Result, SpeckitError};
pub use generate::{GenerationOutcome, GenerationRequest, GenerationResult, Pipeline, generate};
