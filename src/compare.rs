use std::io::Write;

use serde_json::{Map, Value, json};

use crate::{
    BenchCheckError,
    format::{banner, group_thousands},
    report::BenchmarkReport,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencyComparison {
    pub reference_p99_ns: u64,
    pub target_p99_ns: u64,
    /// `target / reference`; below 1.0 means the target is faster.
    pub ratio: f64,
    pub diff_ns: i64,
}

/// Target against reference for a secondary metric. Only reported in JSON.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricComparison {
    pub reference: u64,
    pub target: u64,
    pub ratio: f64,
    pub diff: i64,
}

impl MetricComparison {
    /// `None` when the reference has no value to divide by.
    pub fn between(reference: u64, target: u64) -> Option<Self> {
        (reference > 0).then(|| Self {
            reference,
            target,
            ratio: target as f64 / reference as f64,
            diff: signed_diff(target, reference),
        })
    }

    fn to_json(self) -> Value {
        json!({
            "reference": self.reference,
            "target": self.target,
            "ratio": self.ratio,
            "diff": self.diff,
        })
    }
}

/// Side-by-side view of two benchmark runs. Advisory only: a mismatch or a
/// slower target never turns into a failure status.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformComparison {
    pub reference_platform: String,
    pub target_platform: String,
    pub latency: Option<LatencyComparison>,
    /// `throughput.inferences_per_sec`
    pub throughput: Option<MetricComparison>,
    /// `latency.wcet_bound_ns`
    pub wcet: Option<MetricComparison>,
    pub outputs_identical: bool,
}

impl PlatformComparison {
    pub fn new(reference: &BenchmarkReport, target: &BenchmarkReport) -> Self {
        let reference_p99_ns = reference.p99_ns();
        let target_p99_ns = target.p99_ns();
        let latency = (reference_p99_ns > 0).then(|| LatencyComparison {
            reference_p99_ns,
            target_p99_ns,
            ratio: target_p99_ns as f64 / reference_p99_ns as f64,
            diff_ns: signed_diff(target_p99_ns, reference_p99_ns),
        });
        let outputs_identical = hashes_match(reference.output_hash(), target.output_hash());
        tracing::debug!(
            reference = reference.platform_label(),
            target = target.platform_label(),
            has_latency = latency.is_some(),
            outputs_identical,
            "compared benchmark reports"
        );
        Self {
            reference_platform: reference.platform_label().to_string(),
            target_platform: target.platform_label().to_string(),
            latency,
            throughput: MetricComparison::between(
                reference.inferences_per_sec(),
                target.inferences_per_sec(),
            ),
            wcet: MetricComparison::between(reference.wcet_bound_ns(), target.wcet_bound_ns()),
            outputs_identical,
        }
    }

    pub fn bit_identity_label(&self) -> &'static str {
        if self.outputs_identical {
            "✓ VERIFIED"
        } else {
            "✗ MISMATCH"
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<(), BenchCheckError> {
        writeln!(out, "{}", banner())?;
        writeln!(out, "  Cross-Platform Performance Comparison")?;
        writeln!(out, "  Reference: {}", self.reference_platform)?;
        writeln!(out, "  Target: {}", self.target_platform)?;
        writeln!(out, "{}", banner())?;
        writeln!(out)?;

        if let Some(latency) = &self.latency {
            writeln!(out, "Latency (p99):")?;
            writeln!(
                out,
                "  {}: {} ns",
                self.reference_platform,
                group_thousands(latency.reference_p99_ns)
            )?;
            writeln!(
                out,
                "  {}: {} ns",
                self.target_platform,
                group_thousands(latency.target_p99_ns)
            )?;
            writeln!(out, "  Ratio: {:.2}x", latency.ratio)?;
        }
        writeln!(out)?;

        writeln!(out, "Bit Identity: {}", self.bit_identity_label())?;
        writeln!(out)?;
        writeln!(out, "{}", banner())?;
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("command".into(), Value::String("compare".into()));
        object.insert("reference".into(), json!(self.reference_platform));
        object.insert("target".into(), json!(self.target_platform));
        let latency = match &self.latency {
            Some(latency) => json!({
                "reference_p99_ns": latency.reference_p99_ns,
                "target_p99_ns": latency.target_p99_ns,
                "ratio": latency.ratio,
                "diff_ns": latency.diff_ns,
            }),
            None => Value::Null,
        };
        object.insert("latency".into(), latency);
        if let Some(throughput) = self.throughput {
            object.insert("throughput".into(), throughput.to_json());
        }
        if let Some(wcet) = self.wcet {
            object.insert("wcet".into(), wcet.to_json());
        }
        object.insert("outputs_identical".into(), json!(self.outputs_identical));
        Value::Object(object)
    }
}

fn signed_diff(target: u64, reference: u64) -> i64 {
    let diff = i128::from(target) - i128::from(reference);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// Two runs are bit-identical only when both carry the same non-empty hash.
pub fn hashes_match(reference: &str, target: &str) -> bool {
    !reference.is_empty() && reference == target
}
