//! Per-command entry points wiring the CLI to the core.
//!
//! Filesystem reads and payload decoding happen here; the core only ever
//! sees decoded rows and a resolved settings snapshot.
use crate::cli::{JobsArgs, PlanArgs, RunArgs, SettingsArgs, SourceArgs, SourceModeArg};
use crate::decode::{JsonRowsDecoder, TabularDecoder};
use crate::jobs::{load_jobs, JobSource};
use crate::output::{json_block, jobs_preview, plan_preview, settings_blocks};
use crate::plan::build_plan;
use crate::run::{run_pipeline, SimulatedExecutor, SystemClock};
use crate::settings::{resolve_settings_json, Settings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Fixed latency standing in for pipeline work; the core stays synchronous.
const RUN_LATENCY: Duration = Duration::from_millis(650);

fn load_settings(path: &Path) -> Result<Settings> {
    let bytes =
        fs::read(path).with_context(|| format!("read settings file {}", path.display()))?;
    Ok(resolve_settings_json(&bytes)?)
}

fn job_source(args: &SourceArgs) -> Result<JobSource> {
    match args.source {
        SourceModeArg::Single => Ok(JobSource::Single {
            channel: args.channel.clone().unwrap_or_default(),
        }),
        SourceModeArg::ExcelBatch => {
            let Some(path) = args.jobs_file.as_deref() else {
                return Ok(JobSource::ExcelBatch { rows: None });
            };
            let bytes =
                fs::read(path).with_context(|| format!("read jobs file {}", path.display()))?;
            let rows = JsonRowsDecoder.decode(&bytes)?;
            Ok(JobSource::ExcelBatch { rows: Some(rows) })
        }
    }
}

fn source_label(args: &SourceArgs) -> Option<String> {
    args.jobs_file
        .as_deref()
        .map(|path| path.display().to_string())
}

pub fn run_settings(args: SettingsArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    println!("{}", json_block(&settings_blocks(&settings))?);
    Ok(())
}

pub fn run_jobs(args: JobsArgs) -> Result<()> {
    let source = job_source(&args.source)?;
    let jobs = load_jobs(&source)?;
    tracing::info!(jobs = jobs.len(), "jobs loaded");
    let label = source_label(&args.source);
    println!("{}", json_block(&jobs_preview(label.as_deref(), &jobs))?);
    Ok(())
}

pub fn run_plan(args: PlanArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    let jobs = load_jobs(&job_source(&args.source)?)?;
    let plan = build_plan(&jobs, &settings)?;
    tracing::info!(steps = plan.len(), "plan ready");
    println!("{}", json_block(&plan_preview(&plan))?);
    Ok(())
}

pub fn run_run(args: RunArgs) -> Result<()> {
    let settings = load_settings(&args.config)?;
    let jobs = load_jobs(&job_source(&args.source)?)?;
    let report = run_pipeline(&jobs, &settings, &SimulatedExecutor, &SystemClock)?;
    thread::sleep(RUN_LATENCY);
    tracing::info!(requested = report.totals.requested, "pipeline complete");
    println!("{}", json_block(&report)?);
    Ok(())
}
