//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sonar-etl",
    version,
    about = "Sonar ETL - load Mongo-export collections into the analytical Postgres schema",
    long_about = "Flatten Mongo-export JSON collections, apply the declarative column \n\
                  mappings, validate primary-key integrity, and full-refresh load the \n\
                  result into the destination schema in foreign-key dependency order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise or lower log verbosity (-v debug, -vv trace, -q errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// When to emit ANSI colors (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Exact log level; takes precedence over -v/-q.
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format: pretty, compact, or json.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to this file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline for all (or selected) datasets.
    Run(RunArgs),

    /// List datasets, their key columns, and the load order.
    Datasets,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Environment config file (connection settings per environment).
    #[arg(long = "config", value_name = "PATH", default_value = "config/etl.yml")]
    pub config: PathBuf,

    /// Mapping registry file (rename/select/DDL per dataset).
    #[arg(
        long = "mappings",
        value_name = "PATH",
        default_value = "config/mappings.yml"
    )]
    pub mappings: PathBuf,

    /// Which environment's connection settings to use.
    #[arg(long = "env", value_name = "NAME", default_value = "development")]
    pub env: String,

    /// Override the environment's input collection directory.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Restrict the run to named datasets (still processed in load order).
    /// On a live run a selected parent also reloads the children its
    /// truncate would cascade into.
    #[arg(long = "dataset", value_name = "NAME")]
    pub datasets: Vec<String>,

    /// Extract, transform, and validate without touching the database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Re-attempts per dataset after a failure (whole-dataset granularity).
    #[arg(long = "retries", default_value_t = 1)]
    pub retries: u32,

    /// Fixed delay between attempts, in seconds.
    #[arg(long = "retry-delay-secs", default_value_t = 300)]
    pub retry_delay_secs: u64,
}

/// Log level flag values.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log format flag values.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
