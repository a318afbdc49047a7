//! CLI argument definitions for the date shifting toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dateshift",
    version,
    about = "Shift patient dates consistently across the tables of a dataset",
    long_about = "Pseudonymize dates in tabular patient records.\n\n\
                  Every date belonging to a patient moves by the same random day offset,\n\
                  consistently across all sheets of the dataset. A persisted linking\n\
                  table makes re-runs byte-reproducible."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Shift dates in a dataset according to a configuration file.
    Shift(ShiftArgs),

    /// Scan delimited files and produce a value-frequency report.
    Scan(ScanArgs),
}

#[derive(Parser)]
pub struct ShiftArgs {
    /// Path to the JSON shift configuration.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the output dataset folder from the configuration.
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Override the random seed from the configuration.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Reuse an existing linking table for reproducible offsets.
    #[arg(long = "linking-table", value_name = "PATH")]
    pub linking_table: Option<PathBuf>,

    /// Where to write the final linking table.
    #[arg(long = "linking-table-output", value_name = "PATH")]
    pub linking_table_output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// CSV files to scan.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output folder for the scan report.
    #[arg(long = "output", value_name = "DIR", default_value = "ScanReport")]
    pub output: PathBuf,

    /// Drop values occurring fewer times than this from the report.
    #[arg(long = "min-cell-count", value_name = "N", default_value_t = 1)]
    pub min_cell_count: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
