//! Topology command implementation

use crate::cli::SpecArgs;
use crate::error::Result;
use crate::specs;
use crate::ui;

/// Print whether the spec is standalone or multi-robot
pub fn run(args: &SpecArgs) -> Result<()> {
    let topology = specs::detect_topology(&args.spec_dir)?;
    print!("{}", ui::format_topology(&args.spec_dir, &topology));
    Ok(())
}
