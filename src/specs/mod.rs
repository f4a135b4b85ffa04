//! Spec bundle loading and validation
//!
//! A spec bundle is the set of markdown documents describing one automation
//! unit. This module handles:
//! - Reading the per-unit documents (from the spec root or a `robot<N>/` dir)
//! - Reading the shared task document, always from the spec root
//! - Reading optional `config/*.md` documents
//! - Heuristic validation of the primary document
//! - Deriving the project name

pub mod naming;
pub mod topology;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use wax::{CandidatePath, Glob, Pattern};

use crate::config::ValidationPolicy;
use crate::error::{Result, SpeckitError};

pub use naming::{check_project_name, determine_project_name, package_name};
pub use topology::{RobotTopology, UnitId, detect_topology};

/// Document kinds a bundle is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Spec,
    Selectors,
    BusinessRules,
    Tests,
    Tasks,
    Plan,
}

impl DocumentKind {
    /// Documents every bundle needs
    pub const REQUIRED: [DocumentKind; 5] = [
        DocumentKind::Spec,
        DocumentKind::Selectors,
        DocumentKind::BusinessRules,
        DocumentKind::Tests,
        DocumentKind::Tasks,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::Spec => "spec.md",
            DocumentKind::Selectors => "selectors.md",
            DocumentKind::BusinessRules => "business-rules.md",
            DocumentKind::Tests => "tests.md",
            DocumentKind::Tasks => "tasks.md",
            DocumentKind::Plan => "plan.md",
        }
    }

    /// Whether the document is read from the spec root even for units
    pub fn is_shared(self) -> bool {
        matches!(self, DocumentKind::Tasks)
    }

    pub fn is_required(self) -> bool {
        !matches!(self, DocumentKind::Plan)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Raw text of one unit's spec documents
#[derive(Debug, Clone, Default)]
pub struct SpecBundle {
    documents: BTreeMap<DocumentKind, String>,
    configs: BTreeMap<String, String>,
}

impl SpecBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, kind: DocumentKind, text: impl Into<String>) -> Self {
        self.documents.insert(kind, text.into());
        self
    }

    pub fn with_config(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.configs.insert(name.into(), text.into());
        self
    }

    pub fn document(&self, kind: DocumentKind) -> Option<&str> {
        self.documents.get(&kind).map(String::as_str)
    }

    /// Document text, or empty when absent
    pub fn text(&self, kind: DocumentKind) -> &str {
        self.document(kind).unwrap_or_default()
    }

    /// `config/*.md` documents keyed by file stem
    pub fn configs(&self) -> &BTreeMap<String, String> {
        &self.configs
    }

    pub fn config(&self, name: &str) -> Option<&str> {
        self.configs.get(name).map(String::as_str)
    }
}

/// One violation reported by [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyDocument(DocumentKind),
    SpecTooShort { length: usize, minimum: usize },
    MissingMarker { marker: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyDocument(kind) => write!(f, "{kind} is missing or empty"),
            ValidationError::SpecTooShort { length, minimum } => write!(
                f,
                "spec.md looks empty or incomplete ({length} characters, at least {minimum} expected)"
            ),
            ValidationError::MissingMarker { marker } => {
                write!(f, "spec.md does not mention '{marker}'")
            }
        }
    }
}

/// Load the bundle for the spec root or for one unit of a multi-robot spec
///
/// `tasks.md` always comes from `spec_dir`. Missing required documents fail
/// with [`SpeckitError::MissingDocument`].
pub fn load(spec_dir: &Path, unit: Option<&UnitId>) -> Result<SpecBundle> {
    let unit_dir = match unit {
        Some(unit) => spec_dir.join(unit.dir_name()),
        None => spec_dir.to_path_buf(),
    };

    let mut bundle = SpecBundle::new();
    for kind in DocumentKind::REQUIRED.into_iter().chain([DocumentKind::Plan]) {
        let dir = if kind.is_shared() { spec_dir } else { &unit_dir };
        let path = dir.join(kind.file_name());

        if !path.is_file() {
            if kind.is_required() {
                return Err(SpeckitError::MissingDocument {
                    path: path.display().to_string(),
                });
            }
            continue;
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|e| SpeckitError::read_failed(&path, &e))?;
        bundle.documents.insert(kind, text);
    }

    bundle.configs = load_configs(spec_dir)?.configs;

    tracing::debug!(
        spec_dir = %spec_dir.display(),
        unit = unit.map(ToString::to_string),
        configs = bundle.configs.len(),
        "spec bundle loaded"
    );
    Ok(bundle)
}

/// Bundle holding only the optional `config/*.md` documents
///
/// Enough for [`determine_project_name`] before any unit is loaded.
pub fn load_configs(spec_dir: &Path) -> Result<SpecBundle> {
    let mut bundle = SpecBundle::new();
    if let Some(config_dir) = find_config_dir(spec_dir) {
        bundle.configs = read_config_documents(&config_dir)?;
    }
    Ok(bundle)
}

/// Locate the optional `config/` directory
///
/// Checked next to the documents first, then at the project root of the
/// usual `specs/NNN-name/` layout.
fn find_config_dir(spec_dir: &Path) -> Option<PathBuf> {
    let local = spec_dir.join("config");
    if local.is_dir() {
        return Some(local);
    }
    let project_root = spec_dir.parent()?.parent()?;
    let shared = project_root.join("config");
    shared.is_dir().then_some(shared)
}

fn read_config_documents(config_dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut configs = BTreeMap::new();
    let Ok(glob) = Glob::new("*.md") else {
        return Ok(configs);
    };

    let entries =
        std::fs::read_dir(config_dir).map_err(|e| SpeckitError::read_failed(config_dir, &e))?;
    for entry_result in entries {
        let Ok(entry) = entry_result else {
            continue;
        };
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !path.is_file() || glob.matched(&CandidatePath::from(file_name)).is_none() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|e| SpeckitError::read_failed(&path, &e))?;
        configs.insert(stem.to_string(), text);
    }
    Ok(configs)
}

/// Check a bundle against the validation policy
///
/// Reports every violation found; never stops at the first one.
pub fn validate(bundle: &SpecBundle, policy: &ValidationPolicy) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for kind in DocumentKind::REQUIRED {
        if bundle.document(kind).is_none_or(|text| text.trim().is_empty()) {
            errors.push(ValidationError::EmptyDocument(kind));
        }
    }

    let spec = bundle.text(DocumentKind::Spec);
    let length = spec.trim().chars().count();
    if length < policy.min_spec_length {
        errors.push(ValidationError::SpecTooShort {
            length,
            minimum: policy.min_spec_length,
        });
    }

    if !policy.required_marker.is_empty() && !spec.contains(&policy.required_marker) {
        errors.push(ValidationError::MissingMarker {
            marker: policy.required_marker.clone(),
        });
    }

    errors
}
