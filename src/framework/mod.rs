//! Base framework acquisition
//!
//! The framework tree is obtained through an ordered chain of attempts, each
//! weaker than the one before:
//!
//! 1. [`AcquisitionTier::NativeTool`] - the templating tool is already on
//!    `PATH`; the template is cloned and instantiated with it.
//! 2. [`AcquisitionTier::InstalledTool`] - the tool is installed first, then
//!    used as in tier 1. Only tried when tier 1 found no tool; a tool that
//!    ran and failed goes straight to tier 3.
//! 3. [`AcquisitionTier::RawClone`] - the cloned template is used verbatim.
//!
//! Every attempt removes its own partial output before the next one runs.
//! Scratch paths inside the work directory are fixed names, never derived
//! from the project name.
//! When the clone itself fails, nothing further can work and acquisition
//! stops with [`SpeckitError::FrameworkUnavailable`].

pub mod fetch;
pub mod tool;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::FrameworkSettings;
use crate::error::{Result, SpeckitError};
use crate::specs::package_name;

pub use fetch::{GitFetcher, TemplateFetcher};
pub use tool::{SystemToolRunner, ToolRunner};

/// Descriptor file the templating tool reads its variables from
pub const TOOL_CONTEXT_FILE: &str = "cookiecutter.json";

const TEMPLATE_DIR: &str = "template";
const FRAMEWORK_DIR: &str = "framework";
const TOOL_OUTPUT_DIR: &str = "output";

/// How the framework tree was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionTier {
    NativeTool,
    InstalledTool,
    RawClone,
}

impl fmt::Display for AcquisitionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionTier::NativeTool => "native tool",
            AcquisitionTier::InstalledTool => "installed tool",
            AcquisitionTier::RawClone => "raw clone",
        };
        f.write_str(name)
    }
}

/// A usable framework tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub path: PathBuf,
    pub tier: AcquisitionTier,
}

/// Why an attempt did not produce a tree
enum TierFailure {
    /// Preconditions unmet; nothing was attempted
    Skip(SpeckitError),
    /// The attempt ran and failed; later tiers may still succeed
    Degrade(SpeckitError),
    /// No later tier can succeed
    Fatal(SpeckitError),
}

/// State shared by the attempts of one acquisition
#[derive(Default)]
struct AcquireState {
    /// Raw template checkout, reused across tiers
    checkout: Option<PathBuf>,
    /// The tool was found and ran, but failed
    tool_failed: bool,
    last_error: Option<SpeckitError>,
}

type TierResult = std::result::Result<PathBuf, TierFailure>;
type Attempt<'a> = Box<dyn FnMut(&mut AcquireState) -> TierResult + 'a>;

/// Obtains the base framework through the degrading tier chain
pub struct FrameworkAcquirer {
    settings: FrameworkSettings,
    runner: Box<dyn ToolRunner>,
    fetcher: Box<dyn TemplateFetcher>,
}

impl fmt::Debug for FrameworkAcquirer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkAcquirer")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FrameworkAcquirer {
    pub fn new(
        settings: FrameworkSettings,
        runner: Box<dyn ToolRunner>,
        fetcher: Box<dyn TemplateFetcher>,
    ) -> Self {
        Self {
            settings,
            runner,
            fetcher,
        }
    }

    /// Acquirer using real processes and libgit2
    pub fn system(settings: FrameworkSettings) -> Self {
        Self::new(settings, Box::new(SystemToolRunner), Box::new(GitFetcher))
    }

    pub fn settings(&self) -> &FrameworkSettings {
        &self.settings
    }

    /// Obtain a framework tree inside `work_dir`
    ///
    /// `work_dir` must exist; everything written lives below it.
    pub fn acquire(&self, work_dir: &Path, project_name: &str) -> Result<Acquisition> {
        let mut attempts: Vec<(AcquisitionTier, Attempt<'_>)> = vec![
            (
                AcquisitionTier::NativeTool,
                Box::new(|state: &mut AcquireState| {
                    self.native_tool(state, work_dir, project_name)
                }),
            ),
            (
                AcquisitionTier::InstalledTool,
                Box::new(|state: &mut AcquireState| {
                    self.installed_tool(state, work_dir, project_name)
                }),
            ),
            (
                AcquisitionTier::RawClone,
                Box::new(|state: &mut AcquireState| self.raw_clone(state, work_dir)),
            ),
        ];

        let mut state = AcquireState::default();
        for (tier, attempt) in &mut attempts {
            match attempt(&mut state) {
                Ok(path) => {
                    tracing::info!(%tier, path = %path.display(), "framework acquired");
                    return Ok(Acquisition { path, tier: *tier });
                }
                Err(TierFailure::Skip(err)) => {
                    tracing::debug!(%tier, error = %err, "framework tier skipped");
                    state.last_error = Some(err);
                }
                Err(TierFailure::Degrade(err)) => {
                    tracing::warn!(%tier, error = %err, "framework tier failed, degrading");
                    state.last_error = Some(err);
                }
                Err(TierFailure::Fatal(err)) => {
                    return Err(self.unavailable(Some(err)));
                }
            }
        }

        Err(self.unavailable(state.last_error))
    }

    fn unavailable(&self, cause: Option<SpeckitError>) -> SpeckitError {
        let reason = match cause {
            Some(SpeckitError::GitCloneFailed { reason, .. }) => reason,
            Some(other) => other.to_string(),
            None => "no acquisition tier succeeded".to_string(),
        };
        SpeckitError::FrameworkUnavailable {
            url: self.settings.repository.clone(),
            reason,
        }
    }

    fn probe_tool(&self, work_dir: &Path) -> Result<()> {
        self.runner.run(
            &self.settings.tool,
            &["--version".to_string()],
            work_dir,
            self.settings.timeout(),
        )
    }

    fn native_tool(
        &self,
        state: &mut AcquireState,
        work_dir: &Path,
        project_name: &str,
    ) -> TierResult {
        self.probe_tool(work_dir).map_err(TierFailure::Skip)?;
        self.instantiate(state, work_dir, project_name)
    }

    fn installed_tool(
        &self,
        state: &mut AcquireState,
        work_dir: &Path,
        project_name: &str,
    ) -> TierResult {
        if state.tool_failed {
            return Err(TierFailure::Skip(SpeckitError::ToolFailed {
                tool: self.settings.tool.clone(),
                reason: "already installed; instantiation failed".to_string(),
            }));
        }
        let Some((program, args)) = self.settings.install.split_first() else {
            return Err(TierFailure::Skip(SpeckitError::ToolFailed {
                tool: self.settings.tool.clone(),
                reason: "no install command configured".to_string(),
            }));
        };
        self.runner
            .run(program, args, work_dir, self.settings.timeout())
            .map_err(TierFailure::Skip)?;
        self.probe_tool(work_dir).map_err(TierFailure::Skip)?;
        self.instantiate(state, work_dir, project_name)
    }

    fn raw_clone(&self, state: &mut AcquireState, work_dir: &Path) -> TierResult {
        match state.checkout.take() {
            Some(checkout) => Ok(checkout),
            None => self.checkout(work_dir.join(FRAMEWORK_DIR)),
        }
    }

    fn checkout(&self, target: PathBuf) -> TierResult {
        remove_if_exists(&target).map_err(TierFailure::Fatal)?;
        match self.fetcher.fetch(
            &self.settings.repository,
            &target,
            self.settings.timeout(),
        ) {
            Ok(()) => Ok(target),
            Err(err) => {
                let _ = remove_if_exists(&target);
                Err(TierFailure::Fatal(err))
            }
        }
    }

    /// Clone the template (once) and run the tool over it
    fn instantiate(
        &self,
        state: &mut AcquireState,
        work_dir: &Path,
        project_name: &str,
    ) -> TierResult {
        let template = match &state.checkout {
            Some(checkout) => checkout.clone(),
            None => {
                let checkout = self.checkout(work_dir.join(TEMPLATE_DIR))?;
                state.checkout = Some(checkout.clone());
                checkout
            }
        };

        let synthesized =
            write_tool_context(&template, project_name).map_err(TierFailure::Degrade)?;
        let output = work_dir.join(TOOL_OUTPUT_DIR);
        remove_if_exists(&output).map_err(TierFailure::Degrade)?;
        std::fs::create_dir_all(&output)
            .map_err(|e| TierFailure::Degrade(SpeckitError::write_failed(&output, &e)))?;

        let args = vec![
            template.to_string_lossy().to_string(),
            "--no-input".to_string(),
            format!("project_name={project_name}"),
        ];
        match self
            .runner
            .run(&self.settings.tool, &args, &output, self.settings.timeout())
        {
            Ok(()) if has_entries(&output) => Ok(output),
            Ok(()) => {
                tracing::debug!("tool produced no project directory, using template checkout");
                let _ = remove_if_exists(&output);
                Ok(template)
            }
            Err(err) => {
                state.tool_failed = true;
                let _ = remove_if_exists(&output);
                if let Some(path) = synthesized {
                    let _ = std::fs::remove_file(path);
                }
                Err(TierFailure::Degrade(err))
            }
        }
    }
}

/// Write a minimal tool descriptor unless the template ships one
///
/// Returns the path when a file was written.
fn write_tool_context(template: &Path, project_name: &str) -> Result<Option<PathBuf>> {
    let path = template.join(TOOL_CONTEXT_FILE);
    if path.exists() {
        return Ok(None);
    }

    let context = serde_json::json!({
        "project_name": project_name,
        "project_slug": package_name(project_name),
    });
    std::fs::write(&path, serde_json::to_string_pretty(&context)?)
        .map_err(|e| SpeckitError::write_failed(&path, &e))?;
    Ok(Some(path))
}

fn has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_some())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| SpeckitError::write_failed(path, &e))?;
    }
    Ok(())
}
