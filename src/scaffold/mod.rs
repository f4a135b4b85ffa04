//! Output project skeleton
//!
//! Layout of one generated unit:
//!
//! ```text
//! <output_dir>/<dir_name>/           project root (requirements.txt, setup.py, README.md)
//! <output_dir>/<dir_name>/<package>/ package (bot.py, classes_t2c/, resources/)
//! ```
//!
//! `<package>` is the importable form of `<dir_name>` (`payroll-robot2` ->
//! `payroll_robot2`).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SpeckitError};
use crate::render::OutputRoot;

/// Package subdirectories created for every unit
pub const PACKAGE_DIRS: [&str; 10] = [
    "classes_t2c/framework",
    "classes_t2c/queue",
    "classes_t2c/dados_execucao",
    "classes_t2c/relatorios",
    "classes_t2c/email/send",
    "classes_t2c/utils",
    "resources/config",
    "resources/sqlite",
    "resources/templates",
    "resources/scripts/analitico_sintetico",
];

/// Directory that marks the root of a framework tree
const FRAMEWORK_MARKER_DIR: &str = "classes_t2c";

/// Text rendering of the `config/*.md` documents, relative to the package
pub const CONFIG_SHEET: &str = "resources/config/Config.md";

/// How deep to look for the framework root inside an acquired tree
const FRAMEWORK_SEARCH_DEPTH: usize = 3;

/// Paths of a created skeleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    pub project_dir: PathBuf,
    pub package_dir: PathBuf,
}

impl Skeleton {
    /// Absolute destination for a path relative to `root`
    pub fn resolve(&self, root: OutputRoot, relative: &str) -> PathBuf {
        match root {
            OutputRoot::Project => self.project_dir.join(relative),
            OutputRoot::Package => self.package_dir.join(relative),
        }
    }
}

/// What happened to the base framework files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub placeholders: Vec<String>,
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| SpeckitError::write_failed(path, &e))
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| SpeckitError::write_failed(path, &e))
}

/// Create the project skeleton for one unit
///
/// **Destructive:** an existing `<output_dir>/<dir_name>` is removed first,
/// including any hand edits made to a previous generation. Both names must be
/// a single plain path component, so nothing outside `output_dir` is touched.
pub fn create_skeleton(output_dir: &Path, dir_name: &str, package: &str) -> Result<Skeleton> {
    ensure_single_component(dir_name)?;
    ensure_single_component(package)?;

    let project_dir = output_dir.join(dir_name);
    if project_dir.exists() {
        tracing::warn!(path = %project_dir.display(), "replacing existing project directory");
        fs::remove_dir_all(&project_dir)
            .map_err(|e| SpeckitError::write_failed(&project_dir, &e))?;
    }

    let package_dir = project_dir.join(package);
    for dir in PACKAGE_DIRS {
        create_dir(&package_dir.join(dir))?;
    }

    tracing::debug!(path = %project_dir.display(), "skeleton created");
    Ok(Skeleton {
        project_dir,
        package_dir,
    })
}

fn ensure_single_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SpeckitError::InvalidProjectName {
            name: name.to_string(),
            reason: "not a single directory name".to_string(),
        }),
    }
}

fn placeholder_text(relative: &str) -> String {
    format!("# T2C framework file\n# TODO: copy from {relative}\n")
}

/// Locate the directory holding `classes_t2c` inside an acquired tree
///
/// Templating tools may nest the project one or two levels down.
pub fn framework_root(framework_dir: &Path) -> PathBuf {
    WalkDir::new(framework_dir)
        .min_depth(0)
        .max_depth(FRAMEWORK_SEARCH_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(std::result::Result::ok)
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == FRAMEWORK_MARKER_DIR)
        .and_then(|entry| entry.path().parent().map(Path::to_path_buf))
        .unwrap_or_else(|| framework_dir.to_path_buf())
}

/// Copy the base framework files into the package
///
/// A file absent from the framework tree is replaced by a placeholder stub.
pub fn copy_framework_files(
    skeleton: &Skeleton,
    framework_dir: &Path,
    files: &[String],
) -> Result<CopyReport> {
    let root = framework_root(framework_dir);
    let mut report = CopyReport::default();

    for relative in files {
        let source = root.join(relative);
        let destination = skeleton.package_dir.join(relative);
        if source.is_file() {
            if let Some(parent) = destination.parent() {
                create_dir(parent)?;
            }
            fs::copy(&source, &destination)
                .map_err(|e| SpeckitError::write_failed(&destination, &e))?;
            report.copied.push(relative.clone());
        } else {
            tracing::warn!(file = %relative, "framework file missing, writing placeholder");
            write_file(&destination, &placeholder_text(relative))?;
            report.placeholders.push(relative.clone());
        }
    }

    Ok(report)
}

/// Write a placeholder for every base framework file
pub fn write_placeholder_framework(skeleton: &Skeleton, files: &[String]) -> Result<CopyReport> {
    for relative in files {
        write_file(&skeleton.package_dir.join(relative), &placeholder_text(relative))?;
    }
    Ok(CopyReport {
        copied: Vec::new(),
        placeholders: files.to_vec(),
    })
}

/// Write [`CONFIG_SHEET`]: every `config/*.md` document under its own heading
///
/// The framework reads its settings from `Config.xlsx`; this file is the
/// source that workbook is built from.
pub fn write_config_sheet(skeleton: &Skeleton, configs: &BTreeMap<String, String>) -> Result<()> {
    let mut text = String::from("# Config\n\n# TODO: build Config.xlsx from the sections below\n");
    if configs.is_empty() {
        text.push_str("\nNo config/*.md documents were found.\n");
    }
    for (name, body) in configs {
        let _ = write!(text, "\n## {name}\n\n{}\n", body.trim_end());
    }
    write_file(&skeleton.package_dir.join(CONFIG_SHEET), &text)
}

/// Write `__init__.py` for the package and `classes_t2c`
pub fn write_package_markers(skeleton: &Skeleton, project_name: &str, version: &str) -> Result<()> {
    let marker = format!("# {project_name} - T2C Framework\n# Version: {version}\n\n");
    write_file(&skeleton.package_dir.join("__init__.py"), &marker)?;
    write_file(
        &skeleton
            .package_dir
            .join(FRAMEWORK_MARKER_DIR)
            .join("__init__.py"),
        &marker,
    )
}
