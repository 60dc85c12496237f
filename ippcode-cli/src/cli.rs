//! Command-line definition.

use std::path::PathBuf;

use clap::{ArgMatches, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ippcode", version, about = "IPPcode18 interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify and execute an IPPcode18 source file
    Run(RunArgs),
    /// Check an IPPcode18 source file without executing it
    Verify {
        /// IPPcode18 source file
        source: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// IPPcode18 source file
    pub source: PathBuf,

    /// File read by READ instead of standard input
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write execution statistics to FILE
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,

    /// Report the number of executed instructions
    #[arg(long, requires = "stats")]
    pub insts: bool,

    /// Report the number of variable writes
    #[arg(long, requires = "stats")]
    pub vars: bool,
}

/// One line of the statistics file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// `--insts`: executed instructions.
    Instructions,
    /// `--vars`: variable writes.
    VariableWrites,
}

/// Counters requested on the `run` command line, in the order their flags
/// were given.
pub fn requested_counters(run: &ArgMatches) -> Vec<Counter> {
    let mut requested: Vec<(usize, Counter)> = [
        ("insts", Counter::Instructions),
        ("vars", Counter::VariableWrites),
    ]
    .into_iter()
    .filter(|(id, _)| run.get_flag(id))
    .map(|(id, counter)| (run.index_of(id).unwrap_or(usize::MAX), counter))
    .collect();
    requested.sort_by_key(|(index, _)| *index);
    requested.into_iter().map(|(_, counter)| counter).collect()
}
