//! The fixed template set
//!
//! Each template has a file name, a destination in the generated project and
//! the finite set of tokens it may contain. Templates are embedded in the
//! binary; a templates directory with the same file names replaces them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpeckitError};

use super::tokens_in;

/// Token names used by the template set
pub mod tokens {
    pub const PROJECT_NAME: &str = "PROJECT_NAME";
    pub const PACKAGE_NAME: &str = "PACKAGE_NAME";
    pub const PROJECT_DESCRIPTION: &str = "PROJECT_DESCRIPTION";
    pub const IMPORTS: &str = "IMPORTS";
    pub const INPUT_VALIDATIONS: &str = "INPUT_VALIDATIONS";
    pub const SPECIAL_CONDITIONS: &str = "SPECIAL_CONDITIONS";
    pub const PROCESSING_RULES: &str = "PROCESSING_RULES";
    pub const MAIN_PROCESSING: &str = "MAIN_PROCESSING";
    pub const QUEUE_FILL: &str = "QUEUE_FILL";
    pub const APP_INITIALIZATION: &str = "APP_INITIALIZATION";
    pub const APP_TEARDOWN: &str = "APP_TEARDOWN";
}

use tokens::{
    APP_INITIALIZATION, APP_TEARDOWN, IMPORTS, INPUT_VALIDATIONS, MAIN_PROCESSING,
    PACKAGE_NAME, PROCESSING_RULES, PROJECT_DESCRIPTION, PROJECT_NAME, QUEUE_FILL,
    SPECIAL_CONDITIONS,
};

/// Where a rendered template is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRoot {
    /// The generated project directory (`<output>/<name>/`)
    Project,
    /// The Python package inside it (`<output>/<name>/<package>/`)
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    Bot,
    Process,
    InitApps,
    CloseApps,
    Requirements,
    Setup,
    Readme,
}

impl TemplateId {
    pub const ALL: [TemplateId; 7] = [
        TemplateId::Bot,
        TemplateId::Process,
        TemplateId::InitApps,
        TemplateId::CloseApps,
        TemplateId::Requirements,
        TemplateId::Setup,
        TemplateId::Readme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TemplateId::Bot => "bot",
            TemplateId::Process => "process",
            TemplateId::InitApps => "init_apps",
            TemplateId::CloseApps => "close_apps",
            TemplateId::Requirements => "requirements",
            TemplateId::Setup => "setup",
            TemplateId::Readme => "readme",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateId::Bot => "bot.py.template",
            TemplateId::Process => "t2c_process.py.template",
            TemplateId::InitApps => "t2c_init_apps.py.template",
            TemplateId::CloseApps => "t2c_close_apps.py.template",
            TemplateId::Requirements => "requirements.txt.template",
            TemplateId::Setup => "setup.py.template",
            TemplateId::Readme => "readme.md.template",
        }
    }

    /// Tokens the template is allowed to contain
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            TemplateId::Bot => &[PROJECT_NAME],
            TemplateId::Process => &[
                PROJECT_NAME,
                IMPORTS,
                INPUT_VALIDATIONS,
                SPECIAL_CONDITIONS,
                PROCESSING_RULES,
                MAIN_PROCESSING,
            ],
            TemplateId::InitApps => &[PROJECT_NAME, IMPORTS, QUEUE_FILL, APP_INITIALIZATION],
            TemplateId::CloseApps => &[PROJECT_NAME, IMPORTS, APP_TEARDOWN],
            TemplateId::Requirements => &[],
            TemplateId::Setup | TemplateId::Readme => {
                &[PROJECT_NAME, PACKAGE_NAME, PROJECT_DESCRIPTION]
            }
        }
    }

    pub fn output(self) -> (OutputRoot, &'static str) {
        match self {
            TemplateId::Bot => (OutputRoot::Package, "bot.py"),
            TemplateId::Process => (OutputRoot::Package, "classes_t2c/framework/T2CProcess.py"),
            TemplateId::InitApps => (
                OutputRoot::Package,
                "classes_t2c/framework/T2CInitAllApplications.py",
            ),
            TemplateId::CloseApps => (
                OutputRoot::Package,
                "classes_t2c/framework/T2CCloseAllApplications.py",
            ),
            TemplateId::Requirements => (OutputRoot::Project, "requirements.txt"),
            TemplateId::Setup => (OutputRoot::Project, "setup.py"),
            TemplateId::Readme => (OutputRoot::Project, "README.md"),
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            TemplateId::Bot => include_str!("../../templates/code/bot.py.template"),
            TemplateId::Process => include_str!("../../templates/code/t2c_process.py.template"),
            TemplateId::InitApps => include_str!("../../templates/code/t2c_init_apps.py.template"),
            TemplateId::CloseApps => {
                include_str!("../../templates/code/t2c_close_apps.py.template")
            }
            TemplateId::Requirements => {
                include_str!("../../templates/code/requirements.txt.template")
            }
            TemplateId::Setup => include_str!("../../templates/code/setup.py.template"),
            TemplateId::Readme => include_str!("../../templates/code/readme.md.template"),
        }
    }
}

/// One loaded template
#[derive(Debug, Clone)]
pub struct Template {
    pub id: TemplateId,
    pub text: String,
}

/// The complete, checked template set
#[derive(Debug, Clone)]
pub struct TemplateSet {
    templates: Vec<Template>,
    source: Option<PathBuf>,
}

impl TemplateSet {
    /// Templates compiled into the binary
    pub fn embedded() -> Self {
        Self {
            templates: TemplateId::ALL
                .iter()
                .map(|id| Template {
                    id: *id,
                    text: id.embedded().to_string(),
                })
                .collect(),
            source: None,
        }
    }

    /// Load every template from `dir`
    ///
    /// Fails if a file is missing or uses a token outside its declared set.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut templates = Vec::with_capacity(TemplateId::ALL.len());
        for id in TemplateId::ALL {
            let path = dir.join(id.file_name());
            if !path.is_file() {
                return Err(SpeckitError::TemplateNotFound {
                    path: path.display().to_string(),
                });
            }
            let text = std::fs::read_to_string(&path)
                .map_err(|e| SpeckitError::read_failed(&path, &e))?;
            templates.push(Template { id, text });
        }

        let set = Self {
            templates,
            source: Some(dir.to_path_buf()),
        };
        set.check()?;
        Ok(set)
    }

    /// Embedded templates, or the directory when one is configured
    pub fn from_dir_or_embedded(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::load(dir),
            None => Ok(Self::embedded()),
        }
    }

    /// Directory the set was loaded from, `None` for the embedded set
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Verify that no template uses an undeclared token
    pub fn check(&self) -> Result<()> {
        for template in &self.templates {
            let declared: BTreeSet<&str> = template.id.tokens().iter().copied().collect();
            let undeclared: Vec<String> = tokens_in(&template.text)
                .into_iter()
                .filter(|token| !declared.contains(token.as_str()))
                .collect();
            if !undeclared.is_empty() {
                return Err(SpeckitError::UnresolvedTemplateToken {
                    template: template.id.name().to_string(),
                    tokens: undeclared,
                });
            }
        }
        Ok(())
    }
}
