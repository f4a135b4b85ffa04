use std::fmt::Write;
use std::path::Path;

use console::Style;

use crate::generate::GenerationOutcome;
use crate::specs::{RobotTopology, ValidationError};

fn bold() -> Style {
    Style::new().bold()
}

/// Summary of a generation run: successes, failures with reasons, outputs
pub fn format_summary(outcome: &GenerationOutcome) -> String {
    let results = outcome.results();
    let (succeeded, failed): (Vec<_>, Vec<_>) = results.iter().partition(|r| r.success);
    let mut out = String::new();

    if !succeeded.is_empty() {
        let _ = writeln!(out, "{}", Style::new().green().bold().apply_to("Generated:"));
        for result in &succeeded {
            let tier = result
                .framework
                .map_or_else(|| "no base framework".to_string(), |tier| tier.to_string());
            let _ = writeln!(
                out,
                "  {} -> {} ({tier})",
                bold().apply_to(result.label()),
                result.output_path.display()
            );
            let counts = result.fragments;
            let _ = writeln!(
                out,
                "    {} validations, {} conditions, {} rules, {} tasks",
                counts.validations, counts.conditions, counts.processing_rules, counts.tasks
            );
            for warning in result.warnings() {
                let _ = writeln!(
                    out,
                    "    {} {}",
                    Style::new().yellow().apply_to("warning:"),
                    warning.message
                );
            }
        }
    }

    if !failed.is_empty() {
        let _ = writeln!(out, "{}", Style::new().red().bold().apply_to("Failed:"));
        for result in &failed {
            let reason = result
                .fatal_error()
                .map_or("unknown error", |record| record.message.as_str());
            let _ = writeln!(
                out,
                "  {} at stage '{}': {reason}",
                bold().apply_to(result.label()),
                result.stage
            );
        }
    }

    let _ = writeln!(
        out,
        "{} of {} unit(s) generated",
        succeeded.len(),
        results.len()
    );
    out
}

/// Validation report for one unit
pub fn format_validation(label: &str, errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return format!("{} {label}\n", Style::new().green().apply_to("ok"));
    }

    let mut out = format!("{} {label}\n", Style::new().red().apply_to("invalid"));
    for error in errors {
        let _ = writeln!(out, "  - {error}");
    }
    out
}

pub fn format_topology(spec_dir: &Path, topology: &RobotTopology) -> String {
    match topology {
        RobotTopology::Standalone => format!("{}: standalone\n", spec_dir.display()),
        RobotTopology::MultiRobot { units } => {
            let mut out = format!(
                "{}: multi-robot ({} units)\n",
                spec_dir.display(),
                units.len()
            );
            for unit in units {
                let _ = writeln!(out, "  {}", bold().apply_to(unit));
            }
            out
        }
    }
}
