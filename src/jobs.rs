//! Job intake: row normalization and source adaptation.
//!
//! Rows arrive with inconsistent key casing; each field resolves through a
//! declared, ordered alias table instead of ad-hoc duck typing, so the
//! accepted spellings are an explicit contract.
use crate::decode::Row;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use serde_json::Value;

const CHANNEL_KEYS: &[&str] = &["channel", "Channel", "CHANNEL"];
const PROXY_KEYS: &[&str] = &["proxy", "Proxy"];
const QUALITY_KEYS: &[&str] = &["quality", "Quality"];
const S3_PREFIX_KEYS: &[&str] = &["s3Prefix", "S3Prefix"];

/// One unit of work. `channel` is always non-empty and trimmed; the override
/// fields are empty when absent.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub channel: String,
    pub proxy: String,
    pub quality: String,
    #[serde(rename = "s3Prefix")]
    pub s3_prefix: String,
}

impl JobDescriptor {
    /// Build a single-entry job carrying only a channel, no overrides.
    pub fn for_channel(channel: impl Into<String>) -> Self {
        JobDescriptor {
            channel: channel.into(),
            proxy: String::new(),
            quality: String::new(),
            s3_prefix: String::new(),
        }
    }
}

/// Where jobs come from: one manual entry or a decoded bulk upload.
#[derive(Debug)]
pub enum JobSource {
    Single { channel: String },
    ExcelBatch { rows: Option<Vec<Row>> },
}

fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn resolve_field(row: &Row, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .map(|value| coerce(value).trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Normalize one raw row; `None` marks the row invalid (no channel).
pub fn normalize_row(row: &Row) -> Option<JobDescriptor> {
    let channel = resolve_field(row, CHANNEL_KEYS);
    if channel.is_empty() {
        return None;
    }
    Some(JobDescriptor {
        channel,
        proxy: resolve_field(row, PROXY_KEYS),
        quality: resolve_field(row, QUALITY_KEYS),
        s3_prefix: resolve_field(row, S3_PREFIX_KEYS),
    })
}

/// Produce an ordered, non-empty job list from the selected source.
pub fn load_jobs(source: &JobSource) -> Result<Vec<JobDescriptor>> {
    match source {
        JobSource::Single { channel } => {
            let channel = channel.trim();
            if channel.is_empty() {
                return Err(PipelineError::validation(
                    "single channel mode needs a channel URL/handle",
                ));
            }
            Ok(vec![JobDescriptor::for_channel(channel)])
        }
        JobSource::ExcelBatch { rows: None } => Err(PipelineError::validation(
            "batch mode selected, but no jobs payload was supplied",
        )),
        JobSource::ExcelBatch { rows: Some(rows) } => {
            let jobs: Vec<JobDescriptor> = rows.iter().filter_map(normalize_row).collect();
            let dropped = rows.len() - jobs.len();
            if dropped > 0 {
                tracing::warn!(dropped, "dropped rows without a channel value");
            }
            if jobs.is_empty() {
                return Err(PipelineError::validation(
                    "no valid rows found; include a `channel` column with values",
                ));
            }
            Ok(jobs)
        }
    }
}
