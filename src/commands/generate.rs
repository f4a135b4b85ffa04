//! Generate command implementation

use std::path::Path;
use std::process::ExitCode;

use console::Term;

use crate::cli::GenerateArgs;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generate::{self, GenerationRequest, Pipeline};
use crate::progress::UnitProgress;
use crate::ui;

/// Run generate command
pub fn run(config_path: Option<&Path>, args: GenerateArgs) -> Result<ExitCode> {
    let config = GeneratorConfig::resolve(config_path, &args.spec_dir)?;
    let pipeline = Pipeline::from_config(config)?;

    let request = GenerationRequest {
        spec_dir: args.spec_dir,
        output_dir: args.output_dir,
        unit: args.robot,
        project_name: args.name,
        skip_framework_download: args.skip_framework_download,
        force: args.force,
    };

    let progress = if args.json || !Term::stderr().is_term() {
        UnitProgress::hidden()
    } else {
        UnitProgress::new()
    };
    let outcome = generate::generate_with_progress(&request, &pipeline, &progress);
    progress.finish();
    let outcome = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", ui::format_summary(&outcome));
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
