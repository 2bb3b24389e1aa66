//! Thread-model benchmark: spawns one OS thread per unit of work.

use std::process::ExitCode;

fn main() -> ExitCode {
    forkbench::cli::main_for::<forkbench::bench::ThreadOrchestrator>()
}
