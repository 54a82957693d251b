use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "racedna",
    version,
    about = "Driver DNA trait scoring over historical race data"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SQLite database with the source tables
    #[arg(long, global = true, env = "RACEDNA_DB", default_value = "racedna.db")]
    pub db: PathBuf,

    #[arg(long, global = true, default_value = racedna_core::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// reject unknown config keys instead of warning
    #[arg(long, global = true)]
    pub strict: bool,

    /// debug-level logging (overrides RACEDNA_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a sample config and create the schema
    Init(InitArgs),
    /// Compute and store DNA profiles for every eligible driver
    Calculate(CalculateArgs),
    /// Compute per-season trait scores
    Timeline(TimelineArgs),
    /// Recompute one driver by id or reference
    Update(UpdateArgs),
    /// List drivers with race counts
    List(ListArgs),
    /// Compute career racing statistics
    Stats(StatsArgs),
    /// Table counts and latest profiles
    Status,
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    /// skip creating tables in --db
    #[arg(long)]
    pub no_schema: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CalculateArgs {
    /// overrides settings.min_races
    #[arg(long)]
    pub min_races: Option<usize>,

    #[arg(long)]
    pub limit: Option<usize>,

    /// overrides settings.parallel
    #[arg(long)]
    pub parallel: Option<usize>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TimelineArgs {
    #[arg(long)]
    pub limit: Option<usize>,

    /// print the stored timeline of this driver (id or reference) afterwards
    #[arg(long)]
    pub driver: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct UpdateArgs {
    /// numeric driver id or driver reference (e.g. "hamilton")
    pub driver: String,

    /// output format: text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = 0)]
    pub min_races: usize,

    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StatsArgs {
    /// only used when no profiles exist yet
    #[arg(long)]
    pub limit: Option<usize>,
}
