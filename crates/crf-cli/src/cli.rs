//! CLI argument definitions for the CRF checker.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "crf-check",
    version,
    about = "Validate clinical-trial case report form submissions",
    long_about = "Validate case report form (CRF) submissions and patient groups.\n\n\
                  Submissions are JSON documents naming the form, its cleaned data\n\
                  and the related records its rules read."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow patient names and field values in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Validator configuration file (TOML).
    #[arg(long = "config", value_name = "TOML", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the forms that have a validator.
    Forms,

    /// Validate a JSON form submission.
    Check(CheckArgs),

    /// Review a JSON list of patients against the group composition rules.
    Group(GroupArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the submission JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the outcome as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct GroupArgs {
    /// Path to a JSON array of patient records.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the review as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
