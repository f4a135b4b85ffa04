//! Generator configuration (speckit.yaml) data structures
//!
//! Every field has a default, so an absent or partial file is valid.
//! Lookup order: explicit `--config` path, then `<spec_dir>/speckit.yaml`,
//! then built-in defaults. `SPECKIT_FRAMEWORK_URL` overrides the framework
//! repository in all cases.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeckitError};

/// File name looked up in the spec directory
pub const CONFIG_FILE: &str = "speckit.yaml";

/// Environment variable overriding `framework.repository`
pub const FRAMEWORK_URL_ENV: &str = "SPECKIT_FRAMEWORK_URL";

const DEFAULT_FRAMEWORK_URL: &str =
    "https://github.com/T2C-Consultoria/prj_botcity_framework_template.git";

/// Generator configuration (speckit.yaml)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base framework source and acquisition tooling
    pub framework: FrameworkSettings,

    /// Heuristic spec checks
    pub validation: ValidationPolicy,

    /// Fragment extraction knobs
    pub extraction: ExtractionPolicy,

    /// Directory with `<name>.template` files; embedded templates when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameworkSettings {
    /// Upstream template repository
    pub repository: String,

    /// Templating tool executable
    pub tool: String,

    /// Command used to install the tool when it is missing
    pub install: Vec<String>,

    /// Limit for each clone or tool invocation
    pub timeout_secs: u64,

    /// Framework version stamped into generated package markers
    pub version: String,

    /// Non-customized files copied from the framework tree, relative to its root
    pub files: Vec<String>,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            repository: DEFAULT_FRAMEWORK_URL.to_string(),
            tool: "cookiecutter".to_string(),
            install: vec![
                "pip".to_string(),
                "install".to_string(),
                "cookiecutter".to_string(),
            ],
            timeout_secs: 300,
            version: "2.2.3".to_string(),
            files: [
                "classes_t2c/framework/T2CLoopStation.py",
                "classes_t2c/framework/T2CInitialization.py",
                "classes_t2c/framework/T2CEndProcess.py",
                "classes_t2c/framework/T2CInitAllSettings.py",
                "classes_t2c/framework/T2CGetTransaction.py",
                "classes_t2c/framework/T2CKillAllProcesses.py",
                "classes_t2c/queue/T2CQueueManager.py",
                "classes_t2c/dados_execucao/T2CDadosExecucao.py",
                "classes_t2c/relatorios/T2CRelatorios.py",
                "classes_t2c/email/send/T2CSendEmail.py",
                "classes_t2c/utils/T2CMaestro.py",
                "classes_t2c/utils/T2CTracker.py",
                "classes_t2c/utils/T2CExceptions.py",
                "classes_t2c/utils/T2CGenericReusable.py",
                "classes_t2c/utils/T2CBackupSqlite.py",
                "classes_t2c/utils/T2CRobotStream.py",
                "classes_t2c/utils/T2CScreenRecorder.py",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

impl FrameworkSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Heuristic validation applied to the primary spec document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Minimum trimmed length of spec.md
    pub min_spec_length: usize,

    /// Substring spec.md must contain; empty disables the check
    pub required_marker: String,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_spec_length: 100,
            required_marker: "T2C".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionPolicy {
    /// Cap on tagged rules rendered per code block
    pub max_fragments: usize,

    /// Task phase whose tasks become the main processing block
    pub process_phase: u32,

    /// Task phase holding the queue-filling task
    pub queue_phase: u32,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            max_fragments: 10,
            process_phase: 2,
            queue_phase: 1,
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Read configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| SpeckitError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_yaml(&yaml).map_err(|e| match e {
            SpeckitError::ConfigParseFailed { reason, .. } => SpeckitError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        // Relative template dirs are anchored at the config file
        if let (Some(dir), Some(parent)) = (config.templates_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.templates_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }

    /// Resolve the effective configuration for a spec directory
    pub fn resolve(explicit: Option<&Path>, spec_dir: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = spec_dir.join(CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(FRAMEWORK_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(url = %url, "framework repository overridden from environment");
                self.framework.repository = url;
            }
        }
    }
}
