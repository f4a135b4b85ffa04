//! Per-unit generation results

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::SpeckitError;
use crate::framework::AcquisitionTier;
use crate::render::FragmentCounts;
use crate::specs::UnitId;

/// Pipeline stages of one unit, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    SpecsLoaded,
    Validated,
    ScaffoldCreated,
    FrameworkAcquired,
    CustomFilesGenerated,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::SpecsLoaded => "specs loaded",
            Stage::Validated => "validated",
            Stage::ScaffoldCreated => "scaffold created",
            Stage::FrameworkAcquired => "framework acquired",
            Stage::CustomFilesGenerated => "custom files generated",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// An error captured while generating a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Last stage reached when the error occurred
    pub stage: Stage,
    /// Diagnostic code, e.g. `speckit::framework::unavailable`
    pub code: String,
    pub message: String,
    pub fatal: bool,
}

impl ErrorRecord {
    pub fn from_error(stage: Stage, error: &SpeckitError, fatal: bool) -> Self {
        Self {
            stage,
            code: error.code_string(),
            message: error.to_string(),
            fatal,
        }
    }
}

/// Outcome of generating one unit
///
/// `stage` is the last stage the unit reached. `success` holds iff no fatal
/// error was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub unit_id: Option<UnitId>,
    pub project_name: String,
    pub output_path: PathBuf,
    pub success: bool,
    pub stage: Stage,
    pub framework: Option<AcquisitionTier>,
    pub fragments: FragmentCounts,
    pub errors: Vec<ErrorRecord>,
}

impl GenerationResult {
    pub fn new(unit_id: Option<UnitId>, project_name: String, output_path: PathBuf) -> Self {
        Self {
            unit_id,
            project_name,
            output_path,
            success: true,
            stage: Stage::Pending,
            framework: None,
            fragments: FragmentCounts::default(),
            errors: Vec::new(),
        }
    }

    /// Label for display, the unit id or the project name
    pub fn label(&self) -> String {
        self.unit_id
            .as_ref()
            .map_or_else(|| self.project_name.clone(), ToString::to_string)
    }

    pub fn record(&mut self, error: &SpeckitError, fatal: bool) {
        if fatal {
            self.success = false;
        }
        self.errors
            .push(ErrorRecord::from_error(self.stage, error, fatal));
    }

    pub fn fatal_error(&self) -> Option<&ErrorRecord> {
        self.errors.iter().find(|record| record.fatal)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.errors.iter().filter(|record| !record.fatal)
    }
}

/// Results of one `generate` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GenerationOutcome {
    Single(GenerationResult),
    Multiple(Vec<GenerationResult>),
}

impl GenerationOutcome {
    pub fn results(&self) -> &[GenerationResult] {
        match self {
            GenerationOutcome::Single(result) => std::slice::from_ref(result),
            GenerationOutcome::Multiple(results) => results,
        }
    }

    pub fn is_success(&self) -> bool {
        self.results().iter().all(|result| result.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_tracks_fatal_records() {
        let mut result = GenerationResult::new(None, "invoices".to_string(), PathBuf::from("out"));
        result.stage = Stage::ScaffoldCreated;

        let unavailable = SpeckitError::FrameworkUnavailable {
            url: "https://example.com/t.git".to_string(),
            reason: "Network error".to_string(),
        };
        result.record(&unavailable, false);
        assert!(result.success);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors[0].code, "speckit::framework::unavailable");
        assert_eq!(result.errors[0].stage, Stage::ScaffoldCreated);

        result.record(
            &SpeckitError::IoError {
                message: "disk full".to_string(),
            },
            true,
        );
        assert!(!result.success);
        assert_eq!(
            result.fatal_error().map(|r| r.message.as_str()),
            Some("IO error: disk full")
        );
    }

    #[test]
    fn test_outcome_success() {
        let ok = GenerationResult::new(UnitId::new(1), "a-robot1".to_string(), PathBuf::new());
        let mut failed = ok.clone();
        failed.success = false;

        assert!(GenerationOutcome::Single(ok.clone()).is_success());
        assert!(!GenerationOutcome::Multiple(vec![ok, failed]).is_success());
    }

    #[test]
    fn test_serializes_unit_as_name() {
        let result = GenerationResult::new(UnitId::new(2), "a-robot2".to_string(), PathBuf::new());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["unit_id"], "robot2");
        assert_eq!(json["stage"], "pending");
    }
}
