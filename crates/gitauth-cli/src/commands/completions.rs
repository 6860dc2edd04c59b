//! `gitauth completions` command.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use clap_complete::Shell;

use super::Cli;

/// Write a completion script for the chosen shell (bash, zsh, fish, elvish,
/// or powershell) to stdout, for the user to source or install.
#[allow(clippy::unnecessary_wraps)]
pub fn run(shell: Shell) -> anyhow::Result<()> {
    generate(shell, &mut Cli::command(), "gitauth", &mut io::stdout());
    Ok(())
}
