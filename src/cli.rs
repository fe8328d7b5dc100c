//! CLI argument parsing for the intake and planning workflow.
//!
//! The CLI is intentionally thin: it reads the settings document and the job
//! source, then hands immutable values to the core, so the same logic can be
//! reused behind another surface.
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Root CLI entrypoint for the pipeline workflow.
#[derive(Parser, Debug)]
#[command(
    name = "ytp",
    version,
    about = "Batch intake and execution planning for channel download pipelines",
    after_help = "Commands:\n  settings --config <file>             Resolve settings and print the config blocks\n  jobs [source options]                Load jobs and print the detection preview\n  plan --config <file> [source]        Build a plan and print the preview\n  run --config <file> [source]         Run the simulated pipeline and print the report\n\nExamples:\n  ytp settings --config settings.json\n  ytp jobs --channel @demo\n  ytp jobs --source excel-batch --jobs-file rows.json\n  ytp plan --config settings.json --source excel-batch --jobs-file rows.json\n  ytp run --config settings.json --channel @demo",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Settings(SettingsArgs),
    Jobs(JobsArgs),
    Plan(PlanArgs),
    Run(RunArgs),
}

/// Job source selection shared by every job-consuming command.
#[derive(Parser, Debug)]
pub struct SourceArgs {
    /// Job source mode
    #[arg(long, value_enum, default_value = "single")]
    pub source: SourceModeArg,

    /// Channel URL/handle for single mode
    #[arg(long, value_name = "CHANNEL")]
    pub channel: Option<String>,

    /// Decoded rows payload (JSON array of row objects) for excel-batch mode
    #[arg(long, value_name = "PATH")]
    pub jobs_file: Option<PathBuf>,
}

/// Source mode selector mirrored from the intake form.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceModeArg {
    Single,
    ExcelBatch,
}

/// Settings command inputs.
#[derive(Parser, Debug)]
#[command(about = "Resolve operator settings and print the config blocks")]
pub struct SettingsArgs {
    /// Settings JSON document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,
}

/// Jobs command inputs.
#[derive(Parser, Debug)]
#[command(about = "Load jobs from the selected source and print a preview")]
pub struct JobsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Plan command inputs.
#[derive(Parser, Debug)]
#[command(about = "Merge jobs with settings into an execution plan")]
pub struct PlanArgs {
    /// Settings JSON document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Run command inputs.
#[derive(Parser, Debug)]
#[command(about = "Run the simulated four-stage pipeline and print the report")]
pub struct RunArgs {
    /// Settings JSON document
    #[arg(long, value_name = "FILE")]
    pub config: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}
