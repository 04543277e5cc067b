//! docmig CLI - apply versioned migrations to a MongoDB database

use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod context;
mod logging;

use cli::{Cli, Commands, RunArgs};
use commands::{run, status, unlock};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let result = match &cli.command {
        None => run::execute(&RunArgs::default(), &cli.global),
        Some(Commands::Run(args)) => run::execute(args, &cli.global),
        Some(Commands::Status(args)) => status::execute(args, &cli.global),
        Some(Commands::Unlock(args)) => unlock::execute(args, &cli.global),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
