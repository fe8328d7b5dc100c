//! JSON views rendered by the CLI.
//!
//! These are presentation-only projections of core types: resolved settings
//! grouped into config blocks, plus bounded previews of detected jobs and
//! built plans. Truncation here never shortens the underlying plan.
use crate::jobs::JobDescriptor;
use crate::plan::{PlanStep, ROTATE_POOL_SENTINEL};
use crate::settings::{Protection, S3Target, ScanMode, Settings};
use anyhow::{Context, Result};
use serde::Serialize;

/// Jobs shown in the detection preview.
pub const JOBS_PREVIEW_LIMIT: usize = 3;

/// Plan steps shown in the plan preview.
pub const PLAN_PREVIEW_LIMIT: usize = 15;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanBlock<'a> {
    mode: ScanMode,
    default_proxy: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DownloadBlock {
    min_quality: String,
    concurrency: u32,
}

/// Resolved settings grouped the way operators configure them.
#[derive(Debug, Serialize)]
pub struct SettingsBlocks<'a> {
    scan: ScanBlock<'a>,
    download: DownloadBlock,
    protection: &'a Protection,
    s3: &'a S3Target,
}

/// Project settings into the four config blocks. The scan block shows which
/// proxy would actually apply: the configured default, the rotation sentinel
/// under proxy mode, or nothing under direct mode.
pub fn settings_blocks(settings: &Settings) -> SettingsBlocks<'_> {
    let default_proxy = if !settings.default_proxy.is_empty() {
        Some(settings.default_proxy.as_str())
    } else if settings.scan_mode == ScanMode::Proxy {
        Some(ROTATE_POOL_SENTINEL)
    } else {
        None
    };
    SettingsBlocks {
        scan: ScanBlock {
            mode: settings.scan_mode,
            default_proxy,
        },
        download: DownloadBlock {
            min_quality: format!("{}p+", settings.quality),
            concurrency: settings.concurrency,
        },
        protection: &settings.protection,
        s3: &settings.s3,
    }
}

/// Detection summary for a loaded jobs payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPreview<'a> {
    file: Option<&'a str>,
    jobs_detected: usize,
    preview: &'a [JobDescriptor],
}

pub fn jobs_preview<'a>(file: Option<&'a str>, jobs: &'a [JobDescriptor]) -> JobsPreview<'a> {
    JobsPreview {
        file,
        jobs_detected: jobs.len(),
        preview: &jobs[..jobs.len().min(JOBS_PREVIEW_LIMIT)],
    }
}

/// Truncated plan view; `total_jobs` always reports the full plan length.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreview<'a> {
    total_jobs: usize,
    plan: &'a [PlanStep],
}

pub fn plan_preview(plan: &[PlanStep]) -> PlanPreview<'_> {
    PlanPreview {
        total_jobs: plan.len(),
        plan: &plan[..plan.len().min(PLAN_PREVIEW_LIMIT)],
    }
}

/// Pretty-print a view for the terminal.
pub fn json_block(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize output block")
}
