use std::io::Write;

use serde_json::{Map, Value, json};

use crate::{
    BenchCheckError,
    format::{format_percent, group_thousands},
    report::BenchmarkReport,
};

/// Percent change from `baseline_ns` to `current_ns`. `None` when there is
/// no baseline to compare against.
pub fn regression_percent(baseline_ns: u64, current_ns: u64) -> Option<f64> {
    if baseline_ns == 0 {
        return None;
    }
    let baseline = baseline_ns as f64;
    Some((current_ns as f64 - baseline) / baseline * 100.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionMeasurement {
    pub baseline_p99_ns: u64,
    pub current_p99_ns: u64,
    pub change_percent: f64,
    pub threshold_percent: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegressionOutcome {
    NoBaseline,
    Pass(RegressionMeasurement),
    Fail(RegressionMeasurement),
}

impl RegressionOutcome {
    pub fn passed(&self) -> bool {
        !matches!(self, RegressionOutcome::Fail(_))
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }

    pub fn status(&self) -> &'static str {
        match self {
            RegressionOutcome::NoBaseline => "no-baseline",
            RegressionOutcome::Pass(_) => "pass",
            RegressionOutcome::Fail(_) => "fail",
        }
    }

    pub fn measurement(&self) -> Option<&RegressionMeasurement> {
        match self {
            RegressionOutcome::NoBaseline => None,
            RegressionOutcome::Pass(m) | RegressionOutcome::Fail(m) => Some(m),
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<(), BenchCheckError> {
        let Some(m) = self.measurement() else {
            writeln!(out, "No baseline latency data")?;
            return Ok(());
        };
        writeln!(out, "Baseline p99: {} ns", group_thousands(m.baseline_p99_ns))?;
        writeln!(out, "Current p99:  {} ns", group_thousands(m.current_p99_ns))?;
        writeln!(out, "Change: {:+.1}%", m.change_percent)?;
        if let RegressionOutcome::Fail(_) = self {
            writeln!(
                out,
                "FAIL: Regression exceeds {}% threshold",
                format_percent(m.threshold_percent)
            )?;
        } else {
            writeln!(out, "PASS: Within threshold")?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("command".into(), Value::String("regression".into()));
        object.insert("status".into(), Value::String(self.status().into()));
        object.insert("passed".into(), json!(self.passed()));
        if let Some(m) = self.measurement() {
            object.insert("baseline_p99_ns".into(), json!(m.baseline_p99_ns));
            object.insert("current_p99_ns".into(), json!(m.current_p99_ns));
            object.insert("change_percent".into(), json!(m.change_percent));
            object.insert("threshold_percent".into(), json!(m.threshold_percent));
        }
        Value::Object(object)
    }
}

/// Latency gate between a baseline run and the current run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionCheck {
    threshold_percent: f64,
}

impl RegressionCheck {
    pub fn new(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn evaluate(&self, baseline: &BenchmarkReport, current: &BenchmarkReport) -> RegressionOutcome {
        self.evaluate_ns(baseline.p99_ns(), current.p99_ns())
    }

    pub fn evaluate_ns(&self, baseline_p99_ns: u64, current_p99_ns: u64) -> RegressionOutcome {
        let Some(change_percent) = regression_percent(baseline_p99_ns, current_p99_ns) else {
            // first run of a project has nothing to regress from
            tracing::warn!("baseline has no p99 latency; skipping regression gate");
            return RegressionOutcome::NoBaseline;
        };
        let measurement = RegressionMeasurement {
            baseline_p99_ns,
            current_p99_ns,
            change_percent,
            threshold_percent: self.threshold_percent,
        };
        tracing::debug!(
            baseline_p99_ns,
            current_p99_ns,
            change_percent,
            threshold_percent = self.threshold_percent,
            "evaluated regression gate"
        );
        if change_percent > self.threshold_percent {
            RegressionOutcome::Fail(measurement)
        } else {
            RegressionOutcome::Pass(measurement)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outcome: &RegressionOutcome) -> String {
        let mut buf = Vec::new();
        outcome.write_text(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_regression_percent() {
        assert_eq!(regression_percent(0, 500), None);
        let pct = regression_percent(1000, 1050).unwrap();
        assert!((pct - 5.0).abs() < 1e-9);
        assert_eq!(regression_percent(1000, 500), Some(-50.0));
        assert_eq!(regression_percent(1000, 0), Some(-100.0));
    }

    #[test]
    fn test_zero_baseline_always_passes() {
        for threshold in [-50.0, 0.0, 10.0] {
            let outcome = RegressionCheck::new(threshold).evaluate_ns(0, 1_000_000);
            assert_eq!(outcome, RegressionOutcome::NoBaseline);
            assert_eq!(outcome.exit_code(), 0);
        }
    }

    #[test]
    fn test_zero_threshold_fails_any_increase() {
        let check = RegressionCheck::new(0.0);
        assert_eq!(check.evaluate_ns(1000, 1001).exit_code(), 1);
        assert_eq!(check.evaluate_ns(1000, 1000).exit_code(), 0);
    }

    #[test]
    fn test_unchanged_latency_prints_positive_zero() {
        let outcome = RegressionCheck::new(0.0).evaluate_ns(1000, 1000);
        assert!(outcome.passed());
        assert_eq!(
            render(&outcome),
            "Baseline p99: 1,000 ns\nCurrent p99:  1,000 ns\nChange: +0.0%\nPASS: Within threshold\n"
        );
    }

    #[test]
    fn test_improvement_passes() {
        let outcome = RegressionCheck::new(5.0).evaluate_ns(2000, 1500);
        assert!(outcome.passed());
        assert!(render(&outcome).contains("Change: -25.0%"));
    }

    #[test]
    fn test_negative_threshold_requires_improvement() {
        let check = RegressionCheck::new(-10.0);
        assert!(!check.evaluate_ns(1000, 950).passed());
        assert!(check.evaluate_ns(1000, 850).passed());
    }

    #[test]
    fn test_exactly_at_threshold_passes() {
        let outcome = RegressionCheck::new(25.0).evaluate_ns(1000, 1250);
        assert!(outcome.passed());
    }

    #[test]
    fn test_pass_text() {
        let outcome = RegressionCheck::new(10.0).evaluate_ns(1000, 1050);
        assert_eq!(
            render(&outcome),
            "Baseline p99: 1,000 ns\nCurrent p99:  1,050 ns\nChange: +5.0%\nPASS: Within threshold\n"
        );
    }

    #[test]
    fn test_fail_text() {
        let outcome = RegressionCheck::new(10.0).evaluate_ns(1000, 1200);
        assert_eq!(
            render(&outcome),
            "Baseline p99: 1,000 ns\nCurrent p99:  1,200 ns\nChange: +20.0%\nFAIL: Regression exceeds 10.0% threshold\n"
        );
    }

    #[test]
    fn test_no_baseline_text() {
        assert_eq!(
            render(&RegressionOutcome::NoBaseline),
            "No baseline latency data\n"
        );
    }

    #[test]
    fn test_json_fields() {
        let value = RegressionCheck::new(10.0).evaluate_ns(1000, 1200).to_json();
        assert_eq!(value["command"], "regression");
        assert_eq!(value["status"], "fail");
        assert_eq!(value["passed"], false);
        assert_eq!(value["baseline_p99_ns"], 1000);
        assert_eq!(value["current_p99_ns"], 1200);

        let value = RegressionOutcome::NoBaseline.to_json();
        assert_eq!(value["status"], "no-baseline");
        assert!(value.get("change_percent").is_none());
    }
}
