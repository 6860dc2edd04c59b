//! gitauth - rewrite Git commit authors and committers safely.

use clap::Parser;

mod commands;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    output::set_verbose(cli.verbose);

    let result = match cli.command {
        Commands::Check { path, branch, json } => {
            commands::check::run(path.as_deref(), branch.as_deref(), json)
        }
        Commands::DryRun(args) => commands::dry_run::run(&args),
        Commands::Rewrite(args) => commands::rewrite::run(&args),
        Commands::Backup(args) => commands::backup::run(&args),
        Commands::Push(args) => commands::push::run(&args),
        Commands::Arrange(args) => commands::arrange::run(&args),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
