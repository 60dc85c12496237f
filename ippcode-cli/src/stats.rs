//! Execution statistics export.

use std::fs;
use std::io;
use std::path::Path;

use ippcode_vm::Stats;

use crate::cli::Counter;

/// One line per requested counter, in request order.
pub fn render(counters: &[Counter], stats: &Stats) -> String {
    counters
        .iter()
        .map(|counter| match counter {
            Counter::Instructions => stats.instructions,
            Counter::VariableWrites => stats.variable_writes,
        })
        .map(|value| format!("{value}\n"))
        .collect()
}

/// Write the statistics file, replacing any previous contents.
pub fn write(path: &Path, counters: &[Counter], stats: &Stats) -> io::Result<()> {
    fs::write(path, render(counters, stats))
}
