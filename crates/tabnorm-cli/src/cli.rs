//! CLI argument definitions for tabnorm.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabnorm_model::ScriptDialect;

#[derive(Parser)]
#[command(
    name = "tabnorm",
    version,
    about = "Normalize messy CSV files into a target schema",
    long_about = "Normalize messy CSV files into a caller-defined target schema.\n\n\
                  A generation service writes a transformation program, which is\n\
                  checked, run in a scratch directory and validated. Failures are\n\
                  fed back until the output conforms or the attempt budget is spent."
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

    /// TOML configuration file; command-line flags take precedence.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate, run and repair a program until the output fits the schema.
    Normalize(NormalizeArgs),

    /// Print the profile the generator sees for an input file.
    Profile(ProfileArgs),

    /// Run the contract checker on a program file.
    Check(CheckArgs),

    /// Validate an existing output file against a schema.
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// Raw CSV file to normalize.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON schema file: an array of {"column_name", "description"} objects.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Where the normalized CSV is written.
    #[arg(long = "output", short = 'o', value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Maximum number of generate/check/run/validate attempts.
    #[arg(long = "max-attempts", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Seconds allowed for each generation call.
    #[arg(long = "generation-timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub generation_timeout: Option<u64>,

    /// Seconds allowed for each program run.
    #[arg(long = "execution-timeout", value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub execution_timeout: Option<u64>,

    /// Language of generated programs.
    #[arg(long = "dialect", value_enum)]
    pub dialect: Option<DialectArg>,

    /// Interpreter executable used to run programs.
    #[arg(long = "interpreter", value_name = "PROGRAM")]
    pub interpreter: Option<String>,

    /// Reject output columns that are not part of the schema.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print the run as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of sample rows to include.
    #[arg(long = "rows", value_name = "N")]
    pub rows: Option<usize>,

    /// Print the profile as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Program file to check.
    #[arg(value_name = "PROGRAM")]
    pub program: PathBuf,

    /// Dialect whose contract applies.
    #[arg(long = "dialect", value_enum)]
    pub dialect: Option<DialectArg>,

    /// Print violations as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// CSV file produced by a transformation program.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// JSON schema file: an array of {"column_name", "description"} objects.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Reject columns that are not part of the schema.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Print issues as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DialectArg {
    Python,
    Shell,
}

impl From<DialectArg> for ScriptDialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Python => ScriptDialect::Python,
            DialectArg::Shell => ScriptDialect::Shell,
        }
    }
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
