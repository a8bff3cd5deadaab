//! Argument surface of `palcomp`: verbosity switches up front, then a
//! stream of palette commands executed in order.

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "palcomp", version, about = "Terminal palette composer")]
pub struct Cli {
    /// Reduce noise
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Debugging
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Commands, executed in order (e.g. `vga loeq b0 xfce`)
    #[arg(required = true, allow_hyphen_values = true, trailing_var_arg = true)]
    pub commands: Vec<String>,
}

pub fn log_level(quiet: u8, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (q, _) if q > 0 => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        _ => "debug",
    }
}
