//! Execution plan construction.
//!
//! A plan is a pure per-job merge of descriptor overrides with the settings
//! snapshot; steps never interact, so the builder is a deterministic map
//! with one shared precondition on the destination.
use crate::error::{PipelineError, Result};
use crate::jobs::JobDescriptor;
use crate::settings::{ScanMode, Settings};
use serde::Serialize;

/// Literal proxy assigned when proxy mode is on but nothing is configured at
/// any level; the real executor interprets it as pool rotation.
pub const ROTATE_POOL_SENTINEL: &str = "rotate-pool:auto";

/// Fixed pipeline stage labels, descriptive only.
pub const STAGE_LABELS: [&str; 4] = ["scan metadata", "download", "anti-ban policy", "upload"];

/// One job's fully resolved execution parameters.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub id: usize,
    pub channel: String,
    pub scan_mode: ScanMode,
    pub proxy: Option<String>,
    pub quality: String,
    #[serde(rename = "s3Prefix")]
    pub s3_prefix: String,
    pub steps: [&'static str; 4],
}

/// Shared destination gate for plan preview and run.
pub fn ensure_s3_destination(settings: &Settings) -> Result<()> {
    if settings.s3.bucket.is_empty() || settings.s3.region.is_empty() {
        return Err(PipelineError::validation(
            "s3 bucket and region are required before building a plan",
        ));
    }
    Ok(())
}

fn resolve_proxy(job: &JobDescriptor, settings: &Settings) -> Option<String> {
    if settings.scan_mode != ScanMode::Proxy {
        return None;
    }
    // Strict three-tier fallback: job override, settings default, pool
    // sentinel. No other source is consulted.
    let proxy = if !job.proxy.is_empty() {
        job.proxy.as_str()
    } else if !settings.default_proxy.is_empty() {
        settings.default_proxy.as_str()
    } else {
        ROTATE_POOL_SENTINEL
    };
    Some(proxy.to_string())
}

fn resolve_quality(job: &JobDescriptor, settings: &Settings) -> String {
    let floor = if job.quality.is_empty() {
        settings.quality.as_str()
    } else {
        job.quality.as_str()
    };
    // Quality is a minimum floor, not an exact match.
    format!("{floor}p+")
}

fn resolve_s3_prefix(job: &JobDescriptor, settings: &Settings) -> String {
    if job.s3_prefix.is_empty() {
        settings.s3.prefix.clone()
    } else {
        job.s3_prefix.clone()
    }
}

/// Merge each job with the settings snapshot into an ordered plan,
/// index-for-index with the input.
pub fn build_plan(jobs: &[JobDescriptor], settings: &Settings) -> Result<Vec<PlanStep>> {
    ensure_s3_destination(settings)?;
    Ok(jobs
        .iter()
        .enumerate()
        .map(|(idx, job)| PlanStep {
            id: idx + 1,
            channel: job.channel.clone(),
            scan_mode: settings.scan_mode,
            proxy: resolve_proxy(job, settings),
            quality: resolve_quality(job, settings),
            s3_prefix: resolve_s3_prefix(job, settings),
            steps: STAGE_LABELS,
        })
        .collect())
}
