//! Shell completions command

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Write completions for `args.shell` to stdout
pub fn run(args: &CompletionsArgs) -> Result<()> {
    write(args, &mut std::io::stdout().lock());
    Ok(())
}

fn write(args: &CompletionsArgs, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "rpa-speckit", out);
}
