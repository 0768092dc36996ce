use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;
use serde_json::Value;

use crate::BenchCheckError;

pub const UNKNOWN_PLATFORM: &str = "unknown";

/// Latency block of a benchmark result. `p99_ns` must be a non-negative
/// integer when present; `wcet_bound_ns` is read only if it happens to be one.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LatencyStats {
    #[serde(default)]
    pub p99_ns: Option<u64>,
    #[serde(default)]
    pub wcet_bound_ns: Option<Value>,
}

/// The subset of a benchmark result file the tools consume. Unknown fields
/// are ignored and every consumed field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct BenchmarkReport {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub output_hash: Option<String>,
    #[serde(default)]
    pub latency: Option<LatencyStats>,
    #[serde(default)]
    pub throughput: Option<Value>,
}

impl FromStr for BenchmarkReport {
    type Err = serde_json::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(text)
    }
}

impl BenchmarkReport {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// 99th percentile latency, `0` when the report has no latency data.
    pub fn p99_ns(&self) -> u64 {
        self.latency
            .as_ref()
            .and_then(|latency| latency.p99_ns)
            .unwrap_or(0)
    }

    /// Worst-case execution time bound, `0` when absent or not an integer.
    pub fn wcet_bound_ns(&self) -> u64 {
        self.latency
            .as_ref()
            .and_then(|latency| latency.wcet_bound_ns.as_ref())
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// `throughput.inferences_per_sec`, `0` when absent or not an integer.
    pub fn inferences_per_sec(&self) -> u64 {
        self.throughput
            .as_ref()
            .and_then(|throughput| throughput.get("inferences_per_sec"))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    pub fn platform_label(&self) -> &str {
        self.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM)
    }

    pub fn output_hash(&self) -> &str {
        self.output_hash.as_deref().unwrap_or("")
    }
}

pub fn load_report<P: AsRef<Path>>(path: P) -> Result<BenchmarkReport, BenchCheckError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| BenchCheckError::io(path, e))?;
    let report = BenchmarkReport::from_slice(&data).map_err(|e| BenchCheckError::parse(path, e))?;
    tracing::debug!(
        path = %path.display(),
        platform = report.platform_label(),
        p99_ns = report.p99_ns(),
        "loaded benchmark report"
    );
    Ok(report)
}
