//! `run` and `verify` commands.
//!
//! Each command reports its own errors on stderr and returns the outcome
//! code the process should exit with.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

use ippcode_common::{ErrorCode, Program};
use ippcode_vm::{Fault, Io};
use tracing::{debug, info};

use crate::cli::{Counter, RunArgs};
use crate::stats;

/// Verify and execute a source file.
pub fn run(args: &RunArgs, counters: &[Counter]) -> Result<(), ErrorCode> {
    let program = load(&args.source)?;

    let mut input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{}': {e}", path.display());
                ErrorCode::InputAccess
            })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let mut output = BufWriter::new(io::stdout().lock());
    let mut diagnostic = io::stderr().lock();

    let result = ippcode_vm::run(
        &program,
        Io::new(&mut *input, &mut output, &mut diagnostic),
    );
    drop(output);
    drop(diagnostic);

    let stats = result.map_err(|fault| report(&fault))?;
    info!(
        instructions = stats.instructions,
        variable_writes = stats.variable_writes,
        "run finished"
    );

    if let Some(path) = &args.stats {
        stats::write(path, counters, &stats).map_err(|e| {
            eprintln!("error: cannot write '{}': {e}", path.display());
            ErrorCode::OutputAccess
        })?;
    }
    Ok(())
}

/// Check a source file without executing it.
pub fn verify(source: &Path) -> Result<(), ErrorCode> {
    let program = load(source)?;
    match ippcode_verifier::verify(&program) {
        Ok(checked) => {
            println!(
                "OK: {} ({} instructions, {} labels)",
                source.display(),
                checked.len(),
                checked.labels().len()
            );
            Ok(())
        }
        Err(errors) => Err(report(&Fault::Static(errors))),
    }
}

/// Read and assemble a source file.
fn load(path: &Path) -> Result<Program, ErrorCode> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        ErrorCode::InputAccess
    })?;
    let program = ippcode_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        e.code()
    })?;
    debug!(path = %path.display(), instructions = program.len(), "source loaded");
    Ok(program)
}

/// Print a fault and return its outcome code.
fn report(fault: &Fault) -> ErrorCode {
    match fault {
        Fault::Static(errors) => {
            for e in errors {
                eprintln!("error: {e}");
            }
        }
        Fault::Runtime(e) => eprintln!("runtime error: {e}"),
    }
    fault.code()
}
