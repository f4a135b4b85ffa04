//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::specs::UnitId;

/// rpa-speckit - generate T2C automation projects from markdown specs
#[derive(Parser, Debug)]
#[command(
    name = "rpa-speckit",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Generate T2C RPA project skeletons from markdown specifications",
    long_about = "rpa-speckit reads a spec directory (spec.md, selectors.md, business-rules.md, \
                  tests.md, tasks.md), validates it, acquires the T2C base framework and renders \
                  a customized BotCity project for each automation unit.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rpa-speckit validate specs/001-invoices\n    \
                  rpa-speckit generate specs/001-invoices --output-dir output\n    \
                  rpa-speckit generate specs/002-payroll --robot robot2\n    \
                  rpa-speckit topology specs/002-payroll"
)]
pub struct Cli {
    /// Generator configuration file (defaults to <spec_dir>/speckit.yaml)
    #[arg(long, short = 'c', global = true, env = "SPECKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate project code from a spec directory
    Generate(GenerateArgs),

    /// Validate spec documents without generating anything
    Validate(SpecArgs),

    /// Show whether a spec is standalone or multi-robot
    Topology(SpecArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate every unit:\n    rpa-speckit generate specs/001-invoices\n\n\
                  Generate one unit of a multi-robot spec:\n    rpa-speckit generate specs/002-payroll --robot robot2\n\n\
                  Generate offline, without the base framework:\n    rpa-speckit generate specs/001-invoices --skip-framework-download\n\n\
                  Machine-readable results:\n    rpa-speckit generate specs/001-invoices --json")]
pub struct GenerateArgs {
    /// Spec directory
    pub spec_dir: PathBuf,

    /// Directory the projects are written to
    #[arg(long, short = 'o', default_value = "output")]
    pub output_dir: PathBuf,

    /// Generate only this unit (e.g. robot2)
    #[arg(long, short = 'r', value_parser = parse_unit)]
    pub robot: Option<UnitId>,

    /// Project name (defaults to config/base.md or the spec directory name)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Do not fetch the base framework
    #[arg(long)]
    pub skip_framework_download: bool,

    /// Generate even if the specs fail validation
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Print results as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments shared by commands that only inspect a spec directory
#[derive(Parser, Debug)]
pub struct SpecArgs {
    /// Spec directory
    pub spec_dir: PathBuf,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rpa-speckit completions bash > ~/.bash_completion.d/rpa-speckit\n\n\
                  Generate zsh completions:\n    rpa-speckit completions zsh > ~/.zfunc/_rpa-speckit\n\n\
                  Generate fish completions:\n    rpa-speckit completions fish > ~/.config/fish/completions/rpa-speckit.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

fn parse_unit(value: &str) -> Result<UnitId, String> {
    UnitId::parse(value)
        .or_else(|| value.parse().ok().and_then(UnitId::new))
        .ok_or_else(|| format!("'{value}' is not a unit name like robot1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "rpa-speckit",
            "generate",
            "specs/001-invoices",
            "--robot",
            "robot2",
            "--force",
        ]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.spec_dir, PathBuf::from("specs/001-invoices"));
                assert_eq!(args.output_dir, PathBuf::from("output"));
                assert_eq!(args.robot, UnitId::new(2));
                assert!(args.force);
                assert!(!args.skip_framework_download);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit("robot3"), Ok(UnitId::new(3).unwrap()));
        assert_eq!(parse_unit("3"), Ok(UnitId::new(3).unwrap()));
        assert!(parse_unit("robot0").is_err());
        assert!(parse_unit("bot1").is_err());
    }
}
