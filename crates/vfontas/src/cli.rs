//! Command-line surface of `vfontas`.
//!
//! The interesting part of the interface is not flags but the command
//! stream: words like `loadpsf lat1-16.psf fliph savesfd out.sfd` are
//! executed left to right against one font under assembly. Both
//! `verb arg1 arg2` and `verb=arg1,arg2` spellings are accepted, and a
//! leading dash on a verb is ignored.

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "vfontas", version, about = "Console bitmap font assembler")]
pub struct Cli {
    /// Reduce diagnostic noise
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Increase diagnostic verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Commands, executed in order
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
