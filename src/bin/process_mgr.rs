//! Process-model benchmark: forks one child per unit of work.

use std::process::ExitCode;

#[cfg(unix)]
fn main() -> ExitCode {
    forkbench::cli::main_for::<forkbench::bench::ProcessOrchestrator>()
}

#[cfg(not(unix))]
fn main() -> ExitCode {
    eprintln!("[ERROR] process_mgr needs fork(), which this platform does not provide");
    ExitCode::FAILURE
}
