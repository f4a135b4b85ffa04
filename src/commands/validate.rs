//! Validate command implementation

use std::path::Path;
use std::process::ExitCode;

use console::Style;

use crate::cli::SpecArgs;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::specs::{self, UnitId};
use crate::ui;

/// Validate every unit of a spec directory
///
/// A unit whose documents cannot be loaded is reported as invalid and the
/// remaining units are still checked.
pub fn run(config_path: Option<&Path>, args: &SpecArgs) -> Result<ExitCode> {
    let config = GeneratorConfig::resolve(config_path, &args.spec_dir)?;
    let topology = specs::detect_topology(&args.spec_dir)?;

    let units: Vec<Option<&UnitId>> = if topology.is_multi_robot() {
        topology.units().iter().map(Some).collect()
    } else {
        vec![None]
    };

    let mut all_valid = true;
    for unit in units {
        let label = unit.map_or_else(|| args.spec_dir.display().to_string(), ToString::to_string);
        match specs::load(&args.spec_dir, unit) {
            Ok(bundle) => {
                let errors = specs::validate(&bundle, &config.validation);
                all_valid &= errors.is_empty();
                print!("{}", ui::format_validation(&label, &errors));
            }
            Err(error) => {
                all_valid = false;
                println!("{} {label}", Style::new().red().apply_to("invalid"));
                println!("  - {error}");
            }
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
