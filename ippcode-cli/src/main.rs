//! IPPcode18 CLI: verify and execute IPPcode18 programs.
//!
//! Exit codes:
//! - 0: Success
//! - 10: Bad command line
//! - 11: Source or input file unreadable
//! - 12: Statistics file unwritable
//! - 21: Missing or malformed `.IPPcode18` header
//! - 31, 32, 52: Static verification failure
//! - 52-58: Runtime fault
//! - 99: Internal error

use std::process;

use clap::{CommandFactory, FromArgMatches};
use ippcode_cli::cli::{requested_counters, Cli, Command};
use ippcode_cli::{commands, init_tracing};
use ippcode_common::ErrorCode;

fn main() {
    init_tracing();

    let matches = match Cli::command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => exit_on_usage_error(e),
    };
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => exit_on_usage_error(e),
    };

    let result = match &cli.command {
        Command::Run(args) => {
            let counters = matches
                .subcommand_matches("run")
                .map(requested_counters)
                .unwrap_or_default();
            commands::run(args, &counters)
        }
        Command::Verify { source } => commands::verify(source),
    };

    if let Err(code) = result {
        process::exit(code.value());
    }
}

/// Print a clap error; help and version requests exit 0, everything else
/// is a usage error.
fn exit_on_usage_error(e: clap::Error) -> ! {
    let _ = e.print();
    if e.use_stderr() {
        process::exit(ErrorCode::Usage.value());
    }
    process::exit(0);
}
