//! rpa-speckit - spec-driven code generation for T2C RPA projects

use std::process::ExitCode;

use clap::Parser;
use miette::Diagnostic;

use rpa_speckit::cli::{Cli, Commands};
use rpa_speckit::{commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(config, args),
        Commands::Validate(args) => commands::validate::run(config, &args),
        Commands::Topology(args) => commands::topology::run(&args).map(|()| ExitCode::SUCCESS),
        Commands::Version => commands::version::run().map(|()| ExitCode::SUCCESS),
        Commands::Completions(args) => {
            commands::completions::run(&args).map(|()| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(help) = e.help() {
                eprintln!("  help: {help}");
            }
            ExitCode::FAILURE
        }
    }
}
