//! Tidemark CLI - versioned schema change-sets with an in-database ledger

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{create, rollback, run, status};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    log::debug!("Command-line args: {:?}", std::env::args_os().collect::<Vec<_>>());

    if let Err(err) = dispatch(&cli) {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        log::debug!("{err:?}");
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(args, &cli.global),
        Commands::Create(args) => create::execute(args, &cli.global),
        Commands::Rollback(args) => rollback::execute(args, &cli.global),
        Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
