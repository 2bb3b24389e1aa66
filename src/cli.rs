//! Shared entry point of the `process_mgr` and `thread_mgr` binaries

use std::process::ExitCode;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::bench::{report_error, Orchestrator};
use crate::config::{CliArgs, RunConfiguration};
use crate::models::RunReport;
use crate::{BenchError, Result};

/// Install the stderr diagnostics subscriber; stdout is reserved for the
/// two status lines.
pub fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

/// Start line printed before any context is spawned
pub fn start_line<O: Orchestrator>(config: &RunConfiguration) -> String {
    format!(
        "[Manager] PID {} starting {} {} of type '{}'...",
        std::process::id(),
        config.count,
        O::KIND.noun(),
        config.work_type
    )
}

/// Run a validated configuration with orchestrator `O`, printing the start
/// and completion lines on stdout. Units that failed outright (allocation,
/// file open, panic) turn the run into an error after the report is printed.
pub fn execute<O: Orchestrator>(config: RunConfiguration) -> Result<RunReport> {
    let orchestrator = O::new(config)?;
    let config = orchestrator.config();

    info!("{}: {}", config.work_type, config.work_type.description());
    println!("{}", start_line::<O>(config));

    let report = orchestrator.run()?;
    println!("{}", report.summary(O::KIND.noun()));

    if report.failed_units > 0 {
        return Err(BenchError::Worker(format!(
            "{} of {} {} failed",
            report.failed_units,
            report.count,
            O::KIND.noun()
        )));
    }
    Ok(report)
}

/// Parse the process arguments and run them with orchestrator `O`
pub fn main_for<O: Orchestrator>() -> ExitCode {
    let args = match CliArgs::try_parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(BenchError::Usage(usage)) => {
            eprint!("{}", usage);
            return ExitCode::from(2);
        }
        Err(e) => {
            report_error(&e);
            return ExitCode::from(e.exit_code());
        }
    };

    setup_logging(args.verbose);

    let config = RunConfiguration::new(args.work_type, args.count as usize);
    match execute::<O>(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
