//! Version command implementation

use crate::config::GeneratorConfig;
use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    let defaults = GeneratorConfig::default();

    println!("rpa-speckit {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Framework:");
    println!("  Version: {}", defaults.framework.version);
    println!("  Repository: {}", defaults.framework.repository);
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
