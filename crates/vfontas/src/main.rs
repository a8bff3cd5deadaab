//! vfontas: assemble, transform and vectorize console bitmap fonts.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli::log_level(args.quiet, args.verbose)),
    )
    .init();

    match commands::run(&args.commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vfontas: {err:#}");
            ExitCode::FAILURE
        }
    }
}
