//! Project name derivation

use std::path::Path;

use super::SpecBundle;
use crate::error::{Result, SpeckitError};

/// Keys recognised in `config/base.md`
const NAME_KEYS: [&str; 2] = ["nomeprojeto", "projectname"];

/// Determine the project name for a spec
///
/// A `NomeProjeto: <name>` (or `ProjectName: <name>`) line in
/// `config/base.md` wins; otherwise the spec directory name is used with any
/// leading `NNN-` feature number stripped.
pub fn determine_project_name(spec_dir: &Path, bundle: &SpecBundle) -> String {
    if let Some(name) = bundle.config("base").and_then(name_from_base_config) {
        return name;
    }

    let dir_name = spec_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");
    strip_feature_number(dir_name).to_string()
}

fn name_from_base_config(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim().trim_start_matches(['-', '*', ' ']);
        let line = line.replace("**", "");
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_lowercase();
        let value = value.trim();
        (NAME_KEYS.contains(&key.as_str()) && !value.is_empty()).then(|| value.to_string())
    })
}

/// `001-invoices` -> `invoices`
fn strip_feature_number(dir_name: &str) -> &str {
    match dir_name.split_once('-') {
        Some((prefix, rest)) if is_feature_number(prefix) && !rest.is_empty() => rest,
        _ => dir_name,
    }
}

fn is_feature_number(prefix: &str) -> bool {
    prefix.len() == 3 && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Reject names that cannot be used as a single directory component
///
/// The name becomes `<output_dir>/<name>`, which is replaced on every run,
/// and is written into Python string literals, so separators, quotes, control
/// characters and a leading dot are refused.
pub fn check_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(SpeckitError::InvalidProjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name.starts_with('.') {
        return invalid("name starts with a dot");
    }
    if name.trim() != name {
        return invalid("name has leading or trailing whitespace");
    }
    if let Some(c) = name
        .chars()
        .find(|&c| matches!(c, '/' | '\\' | '"' | '\'' | ':') || c.is_control())
    {
        return invalid(&format!("name contains {c:?}"));
    }
    Ok(())
}

/// Importable Python package name for a project directory name
///
/// `Payroll-robot2` -> `payroll_robot2`. Characters outside `[a-z0-9_]`
/// become underscores; a leading digit gets an underscore prefix.
pub fn package_name(project_name: &str) -> String {
    let mut slug: String = project_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if slug.is_empty() || slug.starts_with(|c: char| c.is_ascii_digit()) {
        slug.insert(0, '_');
    }
    slug
}
