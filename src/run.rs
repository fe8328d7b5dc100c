//! Staged pipeline execution.
//!
//! The runner walks every job through the four fixed stages via a pluggable
//! executor. The in-tree executor simulates unconditional success; a real
//! network executor substitutes behind the same trait without changing the
//! plan or report contracts.
use crate::error::Result;
use crate::jobs::JobDescriptor;
use crate::plan::{build_plan, ensure_s3_destination, PlanStep};
use crate::settings::{S3Target, Settings};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Upper bound on per-job entries kept in the report's sample log.
pub const SAMPLE_LOG_LIMIT: usize = 5;

/// The four fixed pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Download,
    Protect,
    Upload,
}

/// Executes one stage for one resolved step, returning an outcome string.
pub trait StageExecutor {
    fn execute(&self, stage: Stage, step: &PlanStep) -> String;
}

/// Default executor: every stage succeeds trivially. Real scanning,
/// downloading, protection enforcement, and uploads live outside this crate.
#[derive(Debug, Default)]
pub struct SimulatedExecutor;

impl StageExecutor for SimulatedExecutor {
    fn execute(&self, stage: Stage, step: &PlanStep) -> String {
        match stage {
            Stage::Scan | Stage::Protect | Stage::Upload => "ok".to_string(),
            Stage::Download => format!("ok ({})", step.quality),
        }
    }
}

/// Timestamp source for `startedAt`.
pub trait Clock {
    /// Current time as an RFC 3339 string.
    fn now(&self) -> String;
}

/// Wall-clock implementation used by the binary.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Per-stage job counts; equal across stages while no failure path exists.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunTotals {
    pub requested: usize,
    pub scanned: usize,
    pub downloaded: usize,
    pub uploaded_to_s3: usize,
}

/// One job's stage outcomes in the sample log.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StageLogEntry {
    pub job_id: usize,
    pub channel: String,
    pub scan: String,
    pub download: String,
    pub upload: String,
}

/// Aggregate result of one run invocation, read-only after creation.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub started_at: String,
    pub totals: RunTotals,
    pub s3: S3Target,
    pub sample_log: Vec<StageLogEntry>,
}

/// Run every job through the four stages and aggregate a report.
///
/// The plan is re-derived internally, so the destination gate fires here
/// exactly as it does for a plan preview.
pub fn run_pipeline(
    jobs: &[JobDescriptor],
    settings: &Settings,
    executor: &dyn StageExecutor,
    clock: &dyn Clock,
) -> Result<RunReport> {
    ensure_s3_destination(settings)?;
    let started_at = clock.now();
    let plan = build_plan(jobs, settings)?;

    let mut sample_log = Vec::with_capacity(plan.len().min(SAMPLE_LOG_LIMIT));
    for step in &plan {
        let scan = executor.execute(Stage::Scan, step);
        let download = executor.execute(Stage::Download, step);
        let protect = executor.execute(Stage::Protect, step);
        let upload = executor.execute(Stage::Upload, step);
        tracing::debug!(job_id = step.id, channel = %step.channel, protect = %protect, "applied anti-ban policy");
        if sample_log.len() < SAMPLE_LOG_LIMIT {
            sample_log.push(StageLogEntry {
                job_id: step.id,
                channel: step.channel.clone(),
                scan,
                download,
                upload,
            });
        }
    }

    let count = plan.len();
    Ok(RunReport {
        started_at,
        totals: RunTotals {
            requested: count,
            scanned: count,
            downloaded: count,
            uploaded_to_s3: count,
        },
        s3: settings.s3.clone(),
        sample_log,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::settings::{Protection, ScanMode, COOL_DOWN_POLICY};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> String {
            "2026-01-02T03:04:05.000Z".to_string()
        }
    }

    fn settings() -> Settings {
        Settings {
            scan_mode: ScanMode::Direct,
            default_proxy: String::new(),
            quality: "720".to_string(),
            concurrency: 1,
            protection: Protection {
                rotate_ip: false,
                jitter: false,
                user_agent_pool: false,
                cool_down_policy: COOL_DOWN_POLICY,
            },
            s3: S3Target {
                bucket: "media-archive".to_string(),
                region: "us-east-1".to_string(),
                prefix: "yt-downloads/".to_string(),
            },
        }
    }

    fn jobs(count: usize) -> Vec<JobDescriptor> {
        (1..=count)
            .map(|idx| JobDescriptor::for_channel(format!("chan-{idx}")))
            .collect()
    }

    #[test]
    fn totals_are_equal_across_stages() {
        let report =
            run_pipeline(&jobs(3), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        assert_eq!(report.totals.requested, 3);
        assert_eq!(report.totals.scanned, 3);
        assert_eq!(report.totals.downloaded, 3);
        assert_eq!(report.totals.uploaded_to_s3, 3);
    }

    #[test]
    fn sample_log_is_bounded_and_ordered() {
        let report =
            run_pipeline(&jobs(7), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        assert_eq!(report.sample_log.len(), SAMPLE_LOG_LIMIT);
        let ids: Vec<usize> = report.sample_log.iter().map(|entry| entry.job_id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
        assert_eq!(report.sample_log[0].channel, "chan-1");

        let small =
            run_pipeline(&jobs(2), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        assert_eq!(small.sample_log.len(), 2);
    }

    #[test]
    fn simulated_outcomes_carry_the_resolved_quality() {
        let mut overridden = JobDescriptor::for_channel("news");
        overridden.quality = "1080".to_string();
        let report = run_pipeline(
            &[overridden],
            &settings(),
            &SimulatedExecutor,
            &FixedClock,
        )
        .expect("run");
        let entry = &report.sample_log[0];
        assert_eq!(entry.scan, "ok");
        assert_eq!(entry.download, "ok (1080p+)");
        assert_eq!(entry.upload, "ok");
    }

    #[test]
    fn destination_gate_matches_the_plan_builder() {
        let mut settings = settings();
        settings.s3.region.clear();
        let err = run_pipeline(&jobs(1), &settings, &SimulatedExecutor, &FixedClock)
            .expect_err("missing region");
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[test]
    fn identical_inputs_yield_identical_reports() {
        let first =
            run_pipeline(&jobs(4), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        let second =
            run_pipeline(&jobs(4), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        assert_eq!(first, second);
    }

    #[test]
    fn report_serializes_with_wire_field_names() {
        let report =
            run_pipeline(&jobs(1), &settings(), &SimulatedExecutor, &FixedClock).expect("run");
        let value = serde_json::to_value(&report).expect("serialize report");
        assert!(value.get("startedAt").is_some());
        assert!(value["totals"].get("uploadedToS3").is_some());
        assert_eq!(value["sampleLog"][0]["jobId"], 1);
    }
}
