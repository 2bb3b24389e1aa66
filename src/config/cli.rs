//! Command-line argument parsing
//!
//! Both binaries share one grammar: `<program> <type> <count>`.

use clap::{ArgAction, Parser};

use super::WorkType;
use crate::{BenchError, Result};

/// Run one workload across N execution contexts and time the whole fan-out
#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct CliArgs {
    /// Workload to run in every context
    #[arg(value_name = "TYPE", value_enum)]
    pub work_type: WorkType,

    /// Number of execution contexts (1-100)
    #[arg(value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub count: u32,

    /// Diagnostic verbosity on stderr (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Parse arguments, turning every clap failure into a usage error
    pub fn try_parse_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| BenchError::Usage(e.render().to_string()))
    }
}
