//! Operator settings resolution.
//!
//! Settings are resolved from a raw JSON document into an immutable snapshot
//! passed explicitly into every operation, so plan and run behavior never
//! depends on ambient state.
use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// Cool-down descriptor handed to the real executor; a static policy
/// constant, never computed from inputs.
pub const COOL_DOWN_POLICY: &str = "backoff: exponential up to 5m";

/// Quality floor applied when the operator does not set one.
pub const DEFAULT_QUALITY: &str = "720";

/// S3 key prefix applied when the operator leaves it blank.
pub const DEFAULT_S3_PREFIX: &str = "yt-downloads/";

/// How channel metadata is fetched.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Direct,
    Proxy,
}

/// Anti-ban policy descriptor carried through to the executor; the simulated
/// runner does not enforce it.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Protection {
    #[serde(rename = "rotateIP")]
    pub rotate_ip: bool,
    pub jitter: bool,
    pub user_agent_pool: bool,
    pub cool_down_policy: &'static str,
}

/// Destination storage location. `bucket` and `region` must be non-empty
/// before a plan can be built; that gate lives in the plan module.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct S3Target {
    pub bucket: String,
    pub region: String,
    pub prefix: String,
}

/// Resolved global operator configuration, one snapshot per invocation.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub scan_mode: ScanMode,
    pub default_proxy: String,
    pub quality: String,
    pub concurrency: u32,
    pub protection: Protection,
    pub s3: S3Target,
}

/// Raw operator config as written in the settings JSON document.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default)]
    pub scan_mode: Option<ScanMode>,
    #[serde(default)]
    pub default_proxy: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub concurrency: Option<u32>,
    #[serde(default)]
    pub protection: RawProtection,
    #[serde(default)]
    pub s3: RawS3,
}

/// Raw anti-ban toggles; the cool-down policy is not operator-settable.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RawProtection {
    #[serde(default, rename = "rotateIP")]
    pub rotate_ip: bool,
    #[serde(default)]
    pub jitter: bool,
    #[serde(default)]
    pub user_agent_pool: bool,
}

/// Raw destination fields; emptiness is legal here and rejected at plan time.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawS3 {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub prefix: String,
}

/// Resolve a raw config document into a settings snapshot.
///
/// Empty `s3.bucket`/`s3.region` pass through untouched; the destination
/// gate is shared by plan and run, not by resolution.
pub fn resolve_settings(raw: RawSettings) -> Result<Settings> {
    let quality = raw
        .quality
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_QUALITY)
        .to_string();
    if !quality.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(PipelineError::validation(format!(
            "quality must be a numeric height, got `{quality}`"
        )));
    }

    // Zero and missing both fall back to 1, matching the legacy intake form.
    let concurrency = raw.concurrency.filter(|value| *value >= 1).unwrap_or(1);

    let prefix = raw.s3.prefix.trim();
    let s3 = S3Target {
        bucket: raw.s3.bucket.trim().to_string(),
        region: raw.s3.region.trim().to_string(),
        prefix: if prefix.is_empty() {
            DEFAULT_S3_PREFIX.to_string()
        } else {
            prefix.to_string()
        },
    };

    Ok(Settings {
        scan_mode: raw.scan_mode.unwrap_or(ScanMode::Direct),
        default_proxy: raw
            .default_proxy
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        quality,
        concurrency,
        protection: Protection {
            rotate_ip: raw.protection.rotate_ip,
            jitter: raw.protection.jitter,
            user_agent_pool: raw.protection.user_agent_pool,
            cool_down_policy: COOL_DOWN_POLICY,
        },
        s3,
    })
}

/// Parse and resolve a settings JSON document in one step.
pub fn resolve_settings_json(bytes: &[u8]) -> Result<Settings> {
    let raw: RawSettings = serde_json::from_slice(bytes)
        .map_err(|err| PipelineError::validation(format!("parse settings JSON: {err}")))?;
    resolve_settings(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let settings = resolve_settings(RawSettings::default()).expect("resolve defaults");
        assert_eq!(settings.scan_mode, ScanMode::Direct);
        assert_eq!(settings.default_proxy, "");
        assert_eq!(settings.quality, DEFAULT_QUALITY);
        assert_eq!(settings.concurrency, 1);
        assert!(!settings.protection.rotate_ip);
        assert_eq!(settings.protection.cool_down_policy, COOL_DOWN_POLICY);
        assert_eq!(settings.s3.prefix, DEFAULT_S3_PREFIX);
    }

    #[test]
    fn zero_concurrency_falls_back_to_one() {
        let raw = RawSettings {
            concurrency: Some(0),
            ..RawSettings::default()
        };
        let settings = resolve_settings(raw).expect("resolve");
        assert_eq!(settings.concurrency, 1);
    }

    #[test]
    fn non_numeric_quality_is_rejected() {
        let raw = RawSettings {
            quality: Some("ultra".to_string()),
            ..RawSettings::default()
        };
        let err = resolve_settings(raw).expect_err("non-numeric quality");
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn destination_fields_are_trimmed_and_prefix_defaulted() {
        let raw = RawSettings {
            s3: RawS3 {
                bucket: " media-archive ".to_string(),
                region: " us-east-1 ".to_string(),
                prefix: "  ".to_string(),
            },
            ..RawSettings::default()
        };
        let settings = resolve_settings(raw).expect("resolve");
        assert_eq!(settings.s3.bucket, "media-archive");
        assert_eq!(settings.s3.region, "us-east-1");
        assert_eq!(settings.s3.prefix, DEFAULT_S3_PREFIX);
    }

    #[test]
    fn empty_destination_is_legal_at_resolve_time() {
        let settings = resolve_settings(RawSettings::default()).expect("resolve");
        assert_eq!(settings.s3.bucket, "");
        assert_eq!(settings.s3.region, "");
    }

    #[test]
    fn unknown_scan_mode_fails_parse() {
        let err = resolve_settings_json(br#"{"scanMode":"tor"}"#).expect_err("unknown mode");
        assert!(err.to_string().contains("parse settings JSON"));
    }

    #[test]
    fn json_document_round_trips_through_resolution() {
        let settings = resolve_settings_json(
            br#"{
                "scanMode": "proxy",
                "defaultProxy": " socks5://10.0.0.2:1080 ",
                "quality": "1080",
                "concurrency": 4,
                "protection": { "rotateIP": true, "jitter": true, "userAgentPool": false },
                "s3": { "bucket": "b", "region": "r", "prefix": "archive/" }
            }"#,
        )
        .expect("resolve document");
        assert_eq!(settings.scan_mode, ScanMode::Proxy);
        assert_eq!(settings.default_proxy, "socks5://10.0.0.2:1080");
        assert_eq!(settings.quality, "1080");
        assert_eq!(settings.concurrency, 4);
        assert!(settings.protection.jitter);
        assert_eq!(settings.s3.prefix, "archive/");
    }
}
