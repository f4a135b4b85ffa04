//! Generation orchestration
//!
//! Runs every unit of a spec through the pipeline:
//!
//! ```text
//! Pending -> SpecsLoaded -> Validated -> ScaffoldCreated
//!         -> FrameworkAcquired (optional) -> CustomFilesGenerated -> Complete
//! ```
//!
//! Failures are captured into the unit's [`GenerationResult`]. Multi-robot
//! runs keep going after a failed unit; a run restricted to one unit returns
//! the fatal error instead.

pub mod result;

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{Result, SpeckitError};
use crate::framework::FrameworkAcquirer;
use crate::render::{self, TemplateContext, TemplateSet};
use crate::scaffold::{self, Skeleton};
use crate::specs::{self, RobotTopology, UnitId};

pub use result::{ErrorRecord, GenerationOutcome, GenerationResult, Stage};

/// What to generate
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub spec_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Restrict a multi-robot spec to one unit
    pub unit: Option<UnitId>,
    /// Overrides the derived project name
    pub project_name: Option<String>,
    /// Generate without any base framework files
    pub skip_framework_download: bool,
    /// Generate even when validation fails
    pub force: bool,
}

/// Immutable collaborators shared by every unit of a run
#[derive(Debug)]
pub struct Pipeline {
    pub config: GeneratorConfig,
    pub templates: TemplateSet,
    pub acquirer: FrameworkAcquirer,
}

impl Pipeline {
    pub fn new(
        config: GeneratorConfig,
        templates: TemplateSet,
        acquirer: FrameworkAcquirer,
    ) -> Self {
        Self {
            config,
            templates,
            acquirer,
        }
    }

    /// Pipeline with the configured templates and the system acquirer
    pub fn from_config(config: GeneratorConfig) -> Result<Self> {
        let templates = TemplateSet::from_dir_or_embedded(config.templates_dir.as_deref())?;
        let acquirer = FrameworkAcquirer::system(config.framework.clone());
        Ok(Self::new(config, templates, acquirer))
    }
}

/// Observer notified as units start and finish
pub trait ProgressReporter {
    fn unit_started(&self, label: &str, index: usize, total: usize);
    fn unit_finished(&self, result: &GenerationResult);
}

/// Reporter that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn unit_started(&self, _: &str, _: usize, _: usize) {}
    fn unit_finished(&self, _: &GenerationResult) {}
}

/// Generate every unit described by `request.spec_dir`
pub fn generate(request: &GenerationRequest, pipeline: &Pipeline) -> Result<GenerationOutcome> {
    generate_with_progress(request, pipeline, &NoProgress)
}

/// [`generate`] with progress notifications
pub fn generate_with_progress(
    request: &GenerationRequest,
    pipeline: &Pipeline,
    progress: &dyn ProgressReporter,
) -> Result<GenerationOutcome> {
    let spec_dir = canonical_dir(&request.spec_dir)?;
    let project_name = match &request.project_name {
        Some(name) => name.clone(),
        None => specs::determine_project_name(&spec_dir, &specs::load_configs(&spec_dir)?),
    };
    // The name becomes a directory under output_dir, which is wiped on regeneration
    specs::check_project_name(&project_name)?;

    let topology = specs::detect_topology(&spec_dir)?;
    std::fs::create_dir_all(&request.output_dir)
        .map_err(|e| SpeckitError::write_failed(&request.output_dir, &e))?;
    let output_dir = canonical_dir(&request.output_dir)?;
    tracing::info!(
        spec_dir = %spec_dir.display(),
        project = %project_name,
        units = topology.units().len(),
        "starting generation"
    );

    let run = UnitRun {
        request,
        pipeline,
        spec_dir: &spec_dir,
        output_dir: &output_dir,
        project_name: &project_name,
    };

    if let Some(unit) = &request.unit {
        if !topology.units().contains(unit) {
            return Err(SpeckitError::UnitNotFound {
                unit: unit.to_string(),
                spec_dir: spec_dir.display().to_string(),
            });
        }
        progress.unit_started(&unit.to_string(), 1, 1);
        let (result, fatal) = run.unit(Some(unit));
        progress.unit_finished(&result);
        return match fatal {
            Some(error) => Err(error),
            None => Ok(GenerationOutcome::Single(result)),
        };
    }

    match topology {
        RobotTopology::Standalone => {
            progress.unit_started(&project_name, 1, 1);
            let (result, _) = run.unit(None);
            progress.unit_finished(&result);
            Ok(GenerationOutcome::Single(result))
        }
        RobotTopology::MultiRobot { units } => {
            let mut results = Vec::with_capacity(units.len());
            for (index, unit) in units.iter().enumerate() {
                progress.unit_started(&unit.to_string(), index + 1, units.len());
                let (result, _) = run.unit(Some(unit));
                progress.unit_finished(&result);
                results.push(result);
            }
            Ok(GenerationOutcome::Multiple(results))
        }
    }
}

fn canonical_dir(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| SpeckitError::read_failed(path, &e))
}

/// Output directory name of a unit, also used as its package name
pub fn unit_dir_name(project_name: &str, unit: Option<&UnitId>) -> String {
    match unit {
        Some(unit) => format!("{project_name}-{unit}"),
        None => project_name.to_string(),
    }
}

/// Everything a single unit needs
struct UnitRun<'a> {
    request: &'a GenerationRequest,
    pipeline: &'a Pipeline,
    spec_dir: &'a Path,
    output_dir: &'a Path,
    project_name: &'a str,
}

impl UnitRun<'_> {
    /// Run one unit, returning its result and the fatal error if any
    fn unit(&self, unit: Option<&UnitId>) -> (GenerationResult, Option<SpeckitError>) {
        let name = unit_dir_name(self.project_name, unit);
        let mut result =
            GenerationResult::new(unit.cloned(), name.clone(), self.output_dir.join(&name));

        let fatal = match self.stages(unit, &name, &mut result) {
            Ok(()) => {
                result.stage = Stage::Complete;
                tracing::info!(
                    unit = %result.label(),
                    path = %result.output_path.display(),
                    "unit generated"
                );
                None
            }
            Err(error) => {
                tracing::error!(
                    unit = %result.label(),
                    stage = %result.stage,
                    error = %error,
                    "unit failed"
                );
                result.record(&error, true);
                Some(error)
            }
        };
        (result, fatal)
    }

    fn stages(
        &self,
        unit: Option<&UnitId>,
        name: &str,
        result: &mut GenerationResult,
    ) -> Result<()> {
        let config = &self.pipeline.config;

        let bundle = specs::load(self.spec_dir, unit)?;
        result.stage = Stage::SpecsLoaded;

        let violations = specs::validate(&bundle, &config.validation);
        if !violations.is_empty() {
            let error = SpeckitError::ValidationFailure {
                violations: violations.iter().map(ToString::to_string).collect(),
            };
            if !self.request.force {
                return Err(error);
            }
            tracing::warn!(
                unit = %result.label(),
                error = %error,
                "continuing despite validation failure"
            );
            result.record(&error, false);
        }
        result.stage = Stage::Validated;

        let package = specs::package_name(name);
        let skeleton = scaffold::create_skeleton(self.output_dir, name, &package)?;
        result.stage = Stage::ScaffoldCreated;

        if !self.request.skip_framework_download {
            self.install_framework(&skeleton, name, result)?;
        }

        scaffold::write_package_markers(&skeleton, name, &config.framework.version)?;
        scaffold::write_config_sheet(&skeleton, bundle.configs())?;
        let (context, counts) = TemplateContext::for_unit(&bundle, name, &config.extraction);
        result.fragments = counts;
        self.write_templates(&skeleton, &context)?;
        result.stage = Stage::CustomFilesGenerated;

        Ok(())
    }

    /// Acquire the framework in a scratch directory and copy its base files
    ///
    /// An unavailable framework is not fatal: placeholders are written instead.
    fn install_framework(
        &self,
        skeleton: &Skeleton,
        name: &str,
        result: &mut GenerationResult,
    ) -> Result<()> {
        let files = &self.pipeline.config.framework.files;
        let work_dir = tempfile::Builder::new()
            .prefix(&format!(".speckit-{name}-"))
            .tempdir_in(self.output_dir)?;

        match self.pipeline.acquirer.acquire(work_dir.path(), name) {
            Ok(acquisition) => {
                let report = scaffold::copy_framework_files(skeleton, &acquisition.path, files)?;
                tracing::debug!(
                    copied = report.copied.len(),
                    placeholders = report.placeholders.len(),
                    "framework files installed"
                );
                result.framework = Some(acquisition.tier);
                result.stage = Stage::FrameworkAcquired;
            }
            Err(error) => {
                tracing::warn!(
                    unit = %result.label(),
                    error = %error,
                    "writing placeholder framework"
                );
                result.record(&error, false);
                scaffold::write_placeholder_framework(skeleton, files)?;
            }
        }
        Ok(())
    }

    fn write_templates(&self, skeleton: &Skeleton, context: &TemplateContext) -> Result<()> {
        for template in self.pipeline.templates.iter() {
            let rendered = render::render(template.id.name(), &template.text, context)?;
            let (root, relative) = template.id.output();
            scaffold::write_file(&skeleton.resolve(root, relative), &rendered)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameworkSettings;
    use crate::framework::{TemplateFetcher, ToolRunner};
    use std::time::Duration;
    use tempfile::TempDir;

    struct NoTool;

    impl ToolRunner for NoTool {
        fn run(&self, program: &str, _: &[String], _: &Path, _: Duration) -> Result<()> {
            Err(SpeckitError::ToolFailed {
                tool: program.to_string(),
                reason: "not installed".to_string(),
            })
        }
    }

    struct Offline;

    impl TemplateFetcher for Offline {
        fn fetch(&self, url: &str, _: &Path, _: Duration) -> Result<()> {
            Err(SpeckitError::GitCloneFailed {
                url: url.to_string(),
                reason: "Network error".to_string(),
            })
        }
    }

    fn offline_pipeline() -> Pipeline {
        let config = GeneratorConfig::default();
        let acquirer = FrameworkAcquirer::new(
            FrameworkSettings::default(),
            Box::new(NoTool),
            Box::new(Offline),
        );
        Pipeline::new(config, TemplateSet::embedded(), acquirer)
    }

    fn write_unit(dir: &Path, spec: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join("spec.md"), spec).unwrap();
        std::fs::write(dir.join("selectors.md"), "# Selectors\n").unwrap();
        std::fs::write(
            dir.join("business-rules.md"),
            "### VAL001: Invoice number present\n### COND001: Skip weekends\n",
        )
        .unwrap();
        std::fs::write(dir.join("tests.md"), "# Tests\n").unwrap();
    }

    fn good_spec() -> String {
        format!(
            "# Invoices\nUses the T2C Framework.\n{}",
            "Post invoices to the ERP. ".repeat(6)
        )
    }

    fn request(spec_dir: &Path, output_dir: &Path) -> GenerationRequest {
        GenerationRequest {
            spec_dir: spec_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            ..GenerationRequest::default()
        }
    }

    #[test]
    fn test_unit_dir_name() {
        assert_eq!(unit_dir_name("invoices", None), "invoices");
        assert_eq!(unit_dir_name("invoices", UnitId::new(2).as_ref()), "invoices-robot2");
    }

    #[test]
    fn test_offline_generation_writes_placeholders() {
        let temp = TempDir::new().unwrap();
        let spec_dir = temp.path().join("001-invoices");
        write_unit(&spec_dir, &good_spec());
        std::fs::write(spec_dir.join("tasks.md"), "### Task 2.1: Post invoice\n").unwrap();

        let req = request(&spec_dir, &temp.path().join("out"));
        let outcome = generate(&req, &offline_pipeline()).unwrap();
        let GenerationOutcome::Single(result) = outcome else {
            panic!("expected a single result");
        };

        assert!(result.success);
        assert_eq!(result.stage, Stage::Complete);
        assert_eq!(result.framework, None);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors[0].code, "speckit::framework::unavailable");
        assert_eq!(result.fragments.validations, 1);
        assert_eq!(result.fragments.tasks, 1);

        let package = result.output_path.join("invoices");
        assert!(package.join("classes_t2c/framework/T2CLoopStation.py").is_file());
        assert!(package.join("classes_t2c/framework/T2CProcess.py").is_file());

        // Scratch directories are gone
        let leftovers: Vec<_> = std::fs::read_dir(temp.path().join("out"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(leftovers, vec!["invoices".to_string()]);
    }

    #[test]
    fn test_validation_failure_stops_unit_unless_forced() {
        let temp = TempDir::new().unwrap();
        let spec_dir = temp.path().join("specs");
        write_unit(&spec_dir, "short");
        std::fs::write(spec_dir.join("tasks.md"), "# Tasks\n").unwrap();

        let mut req = request(&spec_dir, &temp.path().join("out"));
        req.skip_framework_download = true;

        let outcome = generate(&req, &offline_pipeline()).unwrap();
        let result = &outcome.results()[0];
        assert!(!result.success);
        assert_eq!(result.stage, Stage::SpecsLoaded);
        assert_eq!(result.errors[0].code, "speckit::spec::validation_failed");
        assert!(!temp.path().join("out/specs").exists());

        req.force = true;
        let outcome = generate(&req, &offline_pipeline()).unwrap();
        let result = &outcome.results()[0];
        assert!(result.success);
        assert_eq!(result.stage, Stage::Complete);
        assert!(!result.errors[0].fatal);
    }

    #[test]
    fn test_unit_filter_on_standalone_spec() {
        let temp = TempDir::new().unwrap();
        write_unit(temp.path(), &good_spec());
        std::fs::write(temp.path().join("tasks.md"), "# Tasks\n").unwrap();

        let mut req = request(temp.path(), &temp.path().join("out"));
        req.unit = UnitId::new(1);
        assert!(matches!(
            generate(&req, &offline_pipeline()),
            Err(SpeckitError::UnitNotFound { .. })
        ));
    }

    #[test]
    fn test_unsafe_project_name_is_rejected_before_output() {
        let temp = TempDir::new().unwrap();
        let spec_dir = temp.path().join("001-invoices");
        write_unit(&spec_dir, &good_spec());
        std::fs::write(spec_dir.join("tasks.md"), "# Tasks\n").unwrap();

        let mut req = request(&spec_dir, &temp.path().join("out"));
        req.skip_framework_download = true;
        for name in ["../victim", "nested/name", ".."] {
            req.project_name = Some(name.to_string());
            assert!(matches!(
                generate(&req, &offline_pipeline()),
                Err(SpeckitError::InvalidProjectName { .. })
            ));
        }
        assert!(!temp.path().join("out").exists());
    }

    #[test]
    fn test_project_name_override() {
        let temp = TempDir::new().unwrap();
        let spec_dir = temp.path().join("001-invoices");
        write_unit(&spec_dir, &good_spec());
        std::fs::write(spec_dir.join("tasks.md"), "# Tasks\n").unwrap();

        let mut req = request(&spec_dir, &temp.path().join("out"));
        req.project_name = Some("faturas".to_string());
        req.skip_framework_download = true;

        let outcome = generate(&req, &offline_pipeline()).unwrap();
        let result = &outcome.results()[0];
        assert_eq!(result.project_name, "faturas");
        assert!(result.output_path.join("faturas/bot.py").is_file());
        assert!(result.output_path.join("faturas/resources/config/Config.md").is_file());
        // Skipping acquisition writes no base files at all
        assert!(!result
            .output_path
            .join("faturas/classes_t2c/framework/T2CLoopStation.py")
            .exists());
    }
}
