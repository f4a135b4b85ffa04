//! Error types and handling for rpa-speckit
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for generation operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpeckitError {
    // Spec bundle errors
    #[error("Required spec document not found: {path}")]
    #[diagnostic(
        code(speckit::spec::missing_document),
        help("Every unit needs spec.md, selectors.md, business-rules.md and tests.md; tasks.md lives at the spec root")
    )]
    MissingDocument { path: String },

    #[error("Spec validation failed: {}", .violations.join("; "))]
    #[diagnostic(
        code(speckit::spec::validation_failed),
        help("Complete the spec documents, or pass --force to generate anyway")
    )]
    ValidationFailure { violations: Vec<String> },

    #[error("Invalid project name '{name}': {reason}")]
    #[diagnostic(
        code(speckit::spec::invalid_project_name),
        help("Use a plain name without path separators, quotes or a leading dot, via NomeProjeto in config/base.md or --name")
    )]
    InvalidProjectName { name: String, reason: String },

    #[error("Unit '{unit}' not found in {spec_dir}")]
    #[diagnostic(
        code(speckit::spec::unit_not_found),
        help("Multi-robot specs keep each unit in a robot<N>/ directory starting with robot1/")
    )]
    UnitNotFound { unit: String, spec_dir: String },

    // Framework errors
    #[error("Base framework unavailable from {url}: {reason}")]
    #[diagnostic(
        code(speckit::framework::unavailable),
        help("Check network access to the framework repository, or use --skip-framework-download")
    )]
    FrameworkUnavailable { url: String, reason: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(speckit::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("External tool '{tool}' failed: {reason}")]
    #[diagnostic(code(speckit::framework::tool_failed))]
    ToolFailed { tool: String, reason: String },

    // Template errors
    #[error("Template not found: {path}")]
    #[diagnostic(
        code(speckit::template::not_found),
        help("The templates directory must contain every file of the template set")
    )]
    TemplateNotFound { path: String },

    #[error("Unresolved template tokens in '{template}': {}", .tokens.join(", "))]
    #[diagnostic(
        code(speckit::template::unresolved_token),
        help("The template and its generation context are out of sync; this is a bug")
    )]
    UnresolvedTemplateToken {
        template: String,
        tokens: Vec<String>,
    },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(speckit::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(speckit::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(speckit::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(speckit::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(speckit::fs::io_error))]
    IoError { message: String },
}

impl SpeckitError {
    /// Diagnostic code as a plain string, used in result records
    pub fn code_string(&self) -> String {
        self.code()
            .map_or_else(|| "speckit::unknown".to_string(), |c| c.to_string())
    }

    pub(crate) fn read_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        SpeckitError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn write_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        SpeckitError::FileWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for SpeckitError {
    fn from(err: std::io::Error) -> Self {
        SpeckitError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SpeckitError {
    fn from(err: serde_yaml::Error) -> Self {
        SpeckitError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SpeckitError {
    fn from(err: serde_json::Error) -> Self {
        SpeckitError::IoError {
            message: format!("JSON serialization failed: {err}"),
        }
    }
}

impl From<git2::Error> for SpeckitError {
    fn from(err: git2::Error) -> Self {
        SpeckitError::GitCloneFailed {
            url: "unknown".to_string(),
            reason: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SpeckitError>;
